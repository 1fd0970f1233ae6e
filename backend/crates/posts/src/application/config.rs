//! Application Configuration

/// Posts application configuration
#[derive(Debug, Clone)]
pub struct PostsConfig {
    /// Page size when the client sends no `limit`
    pub default_page_size: i64,
    /// Hard ceiling on a feed page
    pub max_page_size: i64,
    /// Characters of post text kept in a feed snippet
    pub snippet_chars: usize,
}

impl Default for PostsConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 50,
            snippet_chars: 200,
        }
    }
}
