#![deny(warnings)]
pub mod combat;
pub mod eval;
pub mod model;

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "bathala"
    }

    pub const fn codename() -> &'static str {
        "Creature Minds"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

#[cfg(test)]
mod tests {
    use super::AppInfo;

    #[test]
    fn exposes_static_metadata() {
        assert_eq!(AppInfo::name(), "bathala");
        assert_eq!(AppInfo::codename(), "Creature Minds");
        assert!(!AppInfo::version().is_empty());
    }
}
