//! Raw action parameters

/// Flag values as given on the command line, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionParams {
    pub channel: Option<String>,
    pub guild: Option<String>,
    pub user: Option<String>,
    pub message: Option<String>,
    pub discriminator: Option<String>,
    /// User id excluded from discriminator search results
    pub skip: Option<String>,
    pub presence: Option<String>,
}
