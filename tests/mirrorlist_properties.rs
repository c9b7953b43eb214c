//! Property tests for mirror URL expansion and filtering

use kernel_finder::config::mirrorlist::{expand_server_url, resolve_servers};
use proptest::prelude::*;

// Path-ish fragments without placeholders
fn fragment() -> impl Strategy<Value = String> {
    "[a-z0-9./:_-]{0,12}"
}

fn ident() -> impl Strategy<Value = String> {
    "[a-z0-9_]{1,10}"
}

proptest! {
    #[test]
    fn expansion_is_exact(a in fragment(), b in fragment(), c in fragment(), arch in ident(), repo in ident()) {
        let template = format!("{}$repo{}$arch{}", a, b, c);
        let expected = format!("{}{}{}{}{}", a, repo, b, arch, c);
        prop_assert_eq!(expand_server_url(&template, &arch, &repo), expected);
    }

    #[test]
    fn expansion_is_order_independent(a in fragment(), b in fragment(), arch in ident(), repo in ident()) {
        // Sequential replacement in either order gives the same answer as one pass
        let template = format!("{}$arch{}$repo", a, b);
        let arch_first = template.replace("$arch", &arch).replace("$repo", &repo);
        let repo_first = template.replace("$repo", &repo).replace("$arch", &arch);
        let expanded = expand_server_url(&template, &arch, &repo);
        prop_assert_eq!(&expanded, &arch_first);
        prop_assert_eq!(&expanded, &repo_first);
    }

    #[test]
    fn absolute_paths_never_resolved(
        urls in proptest::collection::vec(("(https?://|/)", fragment()), 0..8),
        arch in ident(),
        repo in ident(),
    ) {
        let templates: Vec<String> = urls.iter().map(|(p, f)| format!("{}{}", p, f)).collect();
        let remote = templates.iter().filter(|t| !t.starts_with('/')).count();

        let resolved = resolve_servers(templates.iter().map(String::as_str), &arch, &repo);
        prop_assert_eq!(resolved.len(), remote);
        prop_assert!(resolved.iter().all(|s| !s.starts_with('/')));
    }
}
