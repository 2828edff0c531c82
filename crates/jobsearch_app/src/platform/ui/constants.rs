pub const CMD_SEARCH: &str = "/search";
pub const CMD_CATEGORY: &str = "/category";
pub const CMD_INDUSTRY: &str = "/industry";
pub const CMD_LOCATION: &str = "/location";
pub const CMD_PAGE: &str = "/page";
pub const CMD_HELP: &str = "/help";
pub const CMD_QUIT: &str = "/quit";

/// Companies listed in the analytics footer.
pub const TOP_COMPANIES: usize = 6;

pub const HELP_TEXT: &str = "\
Type a keyword and press Enter to search (an empty line clears it).
  /search            search now with the current keyword
  /category <name>   filter by category, e.g. Remote (no name clears)
  /industry <name>   filter by industry, e.g. Logistics (no name clears)
  /location <text>   filter by location (no text clears)
  /page <n>          show page n
  /help              show this help
  /quit              exit";
