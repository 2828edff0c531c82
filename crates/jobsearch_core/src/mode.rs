#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// The service already filtered and ranked the list; show it as-is.
    Remote,
    /// The list must pass through the local filter engine before display.
    Local,
}

pub fn select_mode(remote_authoritative: bool) -> FilterMode {
    if remote_authoritative {
        FilterMode::Remote
    } else {
        FilterMode::Local
    }
}
