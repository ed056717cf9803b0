use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// A message pattern and the advice shown next to a matching error.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HintRule {
    /// case-insensitive regex matched against the error message
    pub pattern: String,
    pub hint: String,
}

pub static DEFAULT_HINT_RULES: Lazy<Vec<HintRule>> = Lazy::new(|| {
    vec![
        HintRule {
            pattern: r"private|\bage\b|age.?(restricted|gated)|log ?in|sign ?in|cookies?".to_string(),
            hint: "This content may be private or age-restricted. Ask the server operator to \
                   configure cookies (AOI_COOKIEFILE or AOI_COOKIES_BASE64)."
                .to_string(),
        },
        HintRule {
            pattern: r"\b429\b|rate.?limit|too many requests".to_string(),
            hint: "The site is rate-limiting requests. Wait a few minutes and try again."
                .to_string(),
        },
        HintRule {
            pattern: r"no (video )?formats|requested format|unsupported url".to_string(),
            hint: "No downloadable formats were found. Check that the link points to a single \
                   video or track."
                .to_string(),
        },
    ]
});

/// Compiled hint rules. Hints are advisory and never replace the error itself.
#[derive(Clone, Debug)]
pub struct HintRules {
    rules: Vec<(Regex, String)>,
}

impl HintRules {
    pub fn compile(rules: &[HintRule]) -> Result<Self, regex::Error> {
        let rules = rules
            .iter()
            .map(|rule| {
                RegexBuilder::new(&rule.pattern)
                    .case_insensitive(true)
                    .build()
                    .map(|re| (re, rule.hint.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rules })
    }

    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Every matching hint, in rule order.
    pub fn hints_for(&self, message: &str) -> Vec<String> {
        self.rules
            .iter()
            .filter(|(re, _)| re.is_match(message))
            .map(|(_, hint)| hint.clone())
            .collect()
    }
}

impl Default for HintRules {
    fn default() -> Self {
        Self::compile(&DEFAULT_HINT_RULES).unwrap_or_else(|err| {
            log::error!("default hint rules failed to compile: {err}");
            Self::empty()
        })
    }
}
