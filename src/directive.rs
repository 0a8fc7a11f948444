//! Classification of comment lines into `@openapi` directives.

pub const PATH_PREFIX: &str = "@openapi ";
pub const PARAM_PREFIX: &str = "@openapiParam ";
pub const TAGS_PREFIX: &str = "@openapiTags ";
pub const SUMMARY_PREFIX: &str = "@openapiSummary ";
pub const DESC_PREFIX: &str = "@openapiDesc ";
pub const DEPRECATED_PREFIX: &str = "@openapiDeprecated";
pub const REQUEST_PREFIX: &str = "@openapiRequest ";
pub const RESPONSE_PREFIX: &str = "@openapiResponse ";

/// One recognized directive, borrowing its payload from the source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'a> {
    /// `<method> <path>`
    Path(&'a str),
    /// `<name> <key>=<value>[, ...]`
    Param(&'a str),
    /// Comma-separated tag list
    Tags(&'a str),
    Summary(&'a str),
    Description(&'a str),
    Deprecated,
    /// `<content-type> <payload>`
    Request(&'a str),
    /// `<status> <content-type> <payload>`
    Response(&'a str),
}

impl<'a> Directive<'a> {
    /// Classifies a single comment line.
    ///
    /// Leading and trailing whitespace is ignored; prefixes are case-sensitive. Lines that
    /// match no prefix yield `None` so that unrelated annotations pass through.
    pub fn classify(line: &'a str) -> Option<Self> {
        let line = line.trim();

        let table: [(&str, fn(&'a str) -> Directive<'a>); 7] = [
            (PATH_PREFIX, Directive::Path),
            (PARAM_PREFIX, Directive::Param),
            (TAGS_PREFIX, Directive::Tags),
            (SUMMARY_PREFIX, Directive::Summary),
            (DESC_PREFIX, Directive::Description),
            (REQUEST_PREFIX, Directive::Request),
            (RESPONSE_PREFIX, Directive::Response),
        ];

        for (prefix, make) in table {
            if let Some(rest) = line.strip_prefix(prefix) {
                return Some(make(rest.trim()));
            }
        }

        if line.starts_with(DEPRECATED_PREFIX) {
            return Some(Directive::Deprecated);
        }

        None
    }

    /// Directive name as written in comments, for log output.
    pub fn name(&self) -> &'static str {
        match self {
            Directive::Path(_) => "@openapi",
            Directive::Param(_) => "@openapiParam",
            Directive::Tags(_) => "@openapiTags",
            Directive::Summary(_) => "@openapiSummary",
            Directive::Description(_) => "@openapiDesc",
            Directive::Deprecated => "@openapiDeprecated",
            Directive::Request(_) => "@openapiRequest",
            Directive::Response(_) => "@openapiResponse",
        }
    }
}
