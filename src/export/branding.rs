use chrono::{DateTime, Datelike, Utc};
use rand::Rng;
use rand::seq::SliceRandom;

use super::ExportConfig;

/// Header and footer text stamped onto one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branding {
    pub product_name: String,
    pub generated_at: DateTime<Utc>,
    pub user_display_name: String,
    pub caption: Option<String>,
    pub copyright_line: String,
    pub product_url: String,
}

impl Branding {
    /// Composes branding for one export. The caption is drawn from
    /// `config.captions` using the caller's random source.
    pub fn compose<G: Rng + ?Sized>(
        config: &ExportConfig,
        user_display_name: &str,
        generated_at: DateTime<Utc>,
        rng: &mut G,
    ) -> Self {
        Self {
            product_name: config.product_name.clone(),
            generated_at,
            user_display_name: user_display_name.trim().to_owned(),
            caption: config.captions.choose(rng).cloned(),
            copyright_line: format!(
                "© {} {}. All rights reserved.",
                generated_at.year(),
                config.copyright_holder
            ),
            product_url: config.product_url.clone(),
        }
    }

    #[must_use]
    pub fn timestamp_label(&self) -> String {
        format!(
            "Generated on {}",
            self.generated_at.format("%d %b %Y, %H:%M UTC")
        )
    }

    #[must_use]
    pub fn audience_label(&self) -> Option<String> {
        (!self.user_display_name.is_empty())
            .then(|| format!("Prepared for {}", self.user_display_name))
    }
}
