use serde::Serialize;

use crate::chain::Named;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum UserAgent {
    DesktopWindows,
    DesktopMac,
    MobileSafari,
}
impl UserAgent {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DesktopWindows => {
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
                 Chrome/91.0.4472.124 Safari/537.36"
            }
            Self::DesktopMac => {
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like \
                 Gecko) Chrome/120.0.0.0 Safari/537.36"
            }
            Self::MobileSafari => {
                "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 \
                 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1"
            }
        }
    }
}

/// One way of invoking the extraction tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Strategy {
    pub name: &'static str,
    pub use_cookies: bool,
    pub user_agent: UserAgent,
}

impl Named for Strategy {
    fn name(&self) -> &str {
        self.name
    }
}

pub const WITH_COOKIES: Strategy = Strategy {
    name: "with cookies",
    use_cookies: true,
    user_agent: UserAgent::DesktopWindows,
};

pub const WITHOUT_COOKIES: Strategy = Strategy {
    name: "without cookies",
    use_cookies: false,
    user_agent: UserAgent::DesktopWindows,
};

pub const DIFFERENT_USER_AGENT: Strategy = Strategy {
    name: "different UA",
    use_cookies: false,
    user_agent: UserAgent::DesktopMac,
};

pub const MOBILE_USER_AGENT: Strategy = Strategy {
    name: "mobile UA",
    use_cookies: false,
    user_agent: UserAgent::MobileSafari,
};

#[must_use]
pub fn metadata_strategies() -> Vec<Strategy> {
    vec![
        WITH_COOKIES,
        WITHOUT_COOKIES,
        DIFFERENT_USER_AGENT,
        MOBILE_USER_AGENT,
    ]
}

#[must_use]
pub fn download_strategies() -> Vec<Strategy> {
    vec![WITH_COOKIES, WITHOUT_COOKIES, DIFFERENT_USER_AGENT]
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn chains_are_ordered_by_reliability() {
        let names = metadata_strategies()
            .iter()
            .map(|x| x.name)
            .collect::<Vec<_>>();

        assert_eq!(
            names,
            ["with cookies", "without cookies", "different UA", "mobile UA"]
        );
        assert_eq!(download_strategies(), metadata_strategies()[..3].to_vec());
    }

    #[test]
    fn only_the_first_strategy_uses_cookies() {
        let with_cookies = metadata_strategies()
            .into_iter()
            .filter(|x| x.use_cookies)
            .collect::<Vec<_>>();

        assert_eq!(with_cookies, vec![WITH_COOKIES]);
    }

    #[test]
    fn user_agents_are_single_line() {
        for ua in [
            UserAgent::DesktopWindows,
            UserAgent::DesktopMac,
            UserAgent::MobileSafari,
        ] {
            assert!(ua.as_str().starts_with("Mozilla/5.0 ("));
            assert!(!ua.as_str().contains("  "), "{:?}", ua.as_str());
        }
    }
}
