/// Join a base URL and an endpoint path with exactly one `/` between them.
pub fn build_url(base: &str, path: &str) -> String {
    let base = base.strip_suffix('/').unwrap_or(base);
    let path = path.trim_start_matches('/');

    format!("{base}/{path}")
}

/// Turn a base URL and endpoint paths into the full request URLs, keeping the order of `paths`.
///
/// Blank paths are skipped. If no path is left, `defaults` is used instead.
pub fn resolve<P, D>(base: &str, paths: &[P], defaults: &[D]) -> Vec<String>
where
    P: AsRef<str>,
    D: AsRef<str>,
{
    let urls = join_all(base, paths);
    if urls.is_empty() {
        join_all(base, defaults)
    } else {
        urls
    }
}

fn join_all<S: AsRef<str>>(base: &str, paths: &[S]) -> Vec<String> {
    paths
        .iter()
        .map(|path| path.as_ref().trim())
        .filter(|path| !path.is_empty())
        .map(|path| build_url(base, path))
        .collect()
}
