use std::fmt::Display;

/// Query parameters in the order they are appended to the URL.
#[derive(Debug, Default, Clone)]
pub struct QueryParams(Vec<(&'static str, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &'static str, value: impl Display) -> Self {
        self.0.push((key, value.to_string()));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

/// Appends `params` to `url` as `key=value` pairs joined with `&`.
///
/// A `?` is only added when the URL contains none anywhere, so a base URL that already carries a
/// query string is extended with `&` instead. Values are inserted verbatim without percent-encoding.
pub fn add_query_params(url: &str, params: &QueryParams) -> String {
    let mut result = url.to_string();

    if !result.contains('?') {
        result.push('?');
    } else if !result.ends_with(['?', '&']) {
        result.push('&');
    }

    let pairs: Vec<String> = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect();

    result.push_str(&pairs.join("&"));
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adds_params_without_question_mark() {
        let params = QueryParams::new().with("a", 1);

        assert_eq!(add_query_params("http://x/y", &params), "http://x/y?a=1");
    }

    #[test]
    fn appends_to_existing_query() {
        let params = QueryParams::new().with("a", 1);

        assert_eq!(
            add_query_params("http://x/y?z=1", &params),
            "http://x/y?z=1&a=1"
        );
    }

    #[test]
    fn any_question_mark_counts_as_existing_query() {
        let params = QueryParams::new().with("a", 1);

        assert_eq!(
            add_query_params("http://x/what?/upload", &params),
            "http://x/what?/upload&a=1"
        );
    }

    #[test]
    fn trailing_question_mark_is_reused() {
        let params = QueryParams::new().with("a", 1);

        assert_eq!(
            add_query_params("http://localhost:8080?", &params),
            "http://localhost:8080?a=1"
        );
    }

    #[test]
    fn keeps_insertion_order_and_raw_values() {
        let params = QueryParams::new()
            .with("resumableChunkNumber", 3)
            .with("resumableFilename", "my file.txt")
            .with("uploadToken", "abc");

        assert_eq!(
            add_query_params("http://x/upload", &params),
            "http://x/upload?resumableChunkNumber=3&resumableFilename=my file.txt&uploadToken=abc"
        );
    }
}
