//! Mirror-list handling: `Server` extraction and `$arch`/`$repo` expansion.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::ini::parse_ini;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$(arch|repo)").expect("placeholder regex is valid")
});

/// Replace every `$arch` and `$repo` in one left-to-right pass.
///
/// Replacement text is never rescanned, so the result does not depend on
/// which placeholder is handled first.
///
/// # Examples
///
/// ```
/// use kernel_finder::config::mirrorlist::expand_server_url;
///
/// let url = expand_server_url("https://mirror/$repo/os/$arch", "x86_64", "core");
/// assert_eq!(url, "https://mirror/core/os/x86_64");
/// ```
pub fn expand_server_url(template: &str, arch: &str, repo: &str) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| match &caps[1] {
            "arch" => arch.to_string(),
            _ => repo.to_string(),
        })
        .into_owned()
}

/// An entry naming a filesystem path rather than a URL.
pub fn is_local_path(entry: &str) -> bool {
    entry.starts_with('/')
}

/// Raw `Server` values of a mirror-list file, in file order.
///
/// Mirror lists usually have no section header; servers under any header are
/// collected as well.
pub fn parse_mirrorlist(content: &str) -> Vec<String> {
    let doc = parse_ini(content);

    doc.preamble
        .iter()
        .chain(doc.sections.iter().flat_map(|s| s.entries.iter()))
        .filter(|e| e.key.eq_ignore_ascii_case("server"))
        .filter(|e| !e.value.is_empty())
        .map(|e| e.value.clone())
        .collect()
}

/// Expand server templates for `repo`, dropping absolute-path entries.
pub fn resolve_servers<'a, I>(templates: I, arch: &str, repo: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut servers = Vec::new();
    for template in templates {
        if is_local_path(template) {
            log::debug!("[Config] Ignoring local path mirror entry for {}: {}", repo, template);
            continue;
        }
        servers.push(expand_server_url(template, arch, repo));
    }
    servers
}
