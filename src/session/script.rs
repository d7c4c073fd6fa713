//! sclang request builders.
//!
//! Every function returns the exact code chunk sent over the interpreter's
//! stdin. Directories and relative paths are rendered with `/` separators
//! and embedded as escaped sclang string literals.

use std::path::Path;

use crate::utils::path::to_slash;

/// Directory name under `PathName.tmp` used for the scratch help target.
pub const TEMP_TARGET_NAME: &str = "schelp-watch";

/// Quote `text` as a sclang string literal.
pub fn sc_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        if matches!(ch, '\\' | '"') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

fn sc_path(path: &Path) -> String {
    sc_string(&to_slash(path))
}

/// Register `dir` as an extra documentation root (extension mode).
pub fn add_include_path(dir: &Path) -> String {
    format!("LanguageConfig.addIncludePath({})", sc_path(dir))
}

/// Replace the primary documentation source directory (build mode).
pub fn set_help_source_dir(dir: &Path) -> String {
    format!("SCDoc.helpSourceDir = {}", sc_path(dir))
}

pub fn set_help_target_dir(dir: &Path) -> String {
    format!("SCDoc.helpTargetDir = {}", sc_path(dir))
}

/// Copy the current help target into a fresh scratch directory and render
/// there from now on.
pub fn temporary_help_target() -> String {
    format!(
        "var target = PathName.tmp +/+ {name};\n\
         if (File.exists(target)) {{ File.deleteAll(target) }};\n\
         File.copy(SCDoc.helpTargetDir, target);\n\
         SCDoc.helpTargetDir = target;\n\
         \"SCDoc temporary target: %\".format(SCDoc.helpTargetDir)",
        name = sc_string(TEMP_TARGET_NAME),
    )
}

/// Rebuild the document index without re-rendering everything.
pub fn index_all_documents() -> &'static str {
    "SCDoc.indexAllDocuments(false)"
}

/// Look up `rel_path` under `source_dir` and re-render it.
///
/// With `navigate`, the help browser is pointed at the rendered page too.
/// A missing entry becomes a sclang warning.
pub fn recompile_entry(source_dir: &Path, rel_path: &str, navigate: bool) -> String {
    let rel = sc_string(rel_path);
    let missing = sc_string(&format!("{rel_path}: entry not found"));
    let goto = if navigate {
        "\n    HelpBrowser.goTo(entry.destPath);"
    } else {
        ""
    };
    format!(
        "var entry = SCDoc.parseFileMetaData({source},{rel});\n\
         if (entry.notNil) {{\n    \
         SCDoc.parseAndRender(entry);{goto}\n\
         }} {{\n    \
         warn({missing})\n\
         }}",
        source = sc_path(source_dir),
    )
}

pub fn open_help_browser() -> &'static str {
    "HelpBrowser.instance"
}
