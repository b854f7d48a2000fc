//! Configuration module

mod site;

pub use site::BlogConfig;
pub use site::HighlightConfig;
pub use site::NavItem;
pub use site::ProfileConfig;
pub use site::SiteConfig;
pub use site::SocialLink;
