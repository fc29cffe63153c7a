use badgewright_core::panels::topbar::ZoomLimits;
use badgewright_core::store::ViewSettings;

const DOCUMENTATION: &str = r#"# Badgewright preferences. You may edit this file, but be aware that formatting and comments will not
# be preserved. Any missing key takes its default value.

# zoom = 100            Initial zoom, in percent.
# show_grid = false     Start with the grid overlay shown.
# show_guides = false   Start with the guide overlay shown.
# image_root = "..."    Directory relative image sources are found in. Defaults to the working directory.
#
# [zoom_limits]
# min = 10
# max = 400
# step = 10             Percent added or removed by each zoom in / zoom out.

"#;

#[must_use]
pub fn preferences_dir() -> Option<std::path::PathBuf> {
    let mut base_dir = dirs::preference_dir()?;
    base_dir.push(env!("CARGO_PKG_NAME"));
    Some(base_dir)
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub zoom: u32,
    pub show_grid: bool,
    pub show_guides: bool,
    pub image_root: Option<std::path::PathBuf>,
    pub zoom_limits: ZoomLimits,
    #[serde(skip)]
    failed_to_load: bool,
}
impl Default for Preferences {
    fn default() -> Self {
        let view = ViewSettings::default();
        Self {
            zoom: view.zoom,
            show_grid: view.show_grid,
            show_guides: view.show_guides,
            image_root: None,
            zoom_limits: ZoomLimits::default(),
            failed_to_load: false,
        }
    }
}
impl Preferences {
    const FILENAME: &'static str = "preferences.toml";
    /// Load the user's preferences, or defaults if unavailable for some reason.
    #[must_use]
    pub fn load() -> Self {
        match preferences_dir() {
            None => Self::no_path(),
            Some(mut dir) => {
                dir.push(Self::FILENAME);
                Self::load_or_default(&dir)
            }
        }
    }
    #[must_use]
    pub fn no_path() -> Self {
        log::warn!("Preferences weren't available, defaulting.");
        Self {
            failed_to_load: true,
            ..Default::default()
        }
    }
    #[must_use]
    pub fn load_or_default(path: &std::path::Path) -> Self {
        let preferences: anyhow::Result<Self> = try_block::try_block! {
            let string = std::fs::read_to_string(path)?;
            let preferences : Self = toml::from_str(&string)?;
            Ok(preferences)
        };
        match preferences {
            Ok(preferences) => preferences,
            Err(err) => {
                log::debug!("Reading {}: {err}", path.display());
                Self::no_path()
            }
        }
    }
    /// Return true if loading user's settings failed. This can be useful for
    /// displaying a warning.
    #[must_use]
    pub fn did_fail_to_load(&self) -> bool {
        self.failed_to_load
    }
    /// The initial view, with the zoom brought within limits.
    #[must_use]
    pub fn view(&self) -> ViewSettings {
        ViewSettings {
            zoom: self.zoom_limits.clamp(self.zoom),
            show_grid: self.show_grid,
            show_guides: self.show_guides,
        }
    }
    pub fn save(&self) -> anyhow::Result<()> {
        let mut preferences =
            preferences_dir().ok_or_else(|| anyhow::anyhow!("No preferences dir found"))?;
        // Explicity do *not* create recursively. If not found, the user probably has a good reason.
        // Ignore errors (could already exist). Any real errors will be emitted by file access below.
        let _ = std::fs::DirBuilder::new().create(&preferences);

        preferences.push(Self::FILENAME);
        let string = DOCUMENTATION.to_owned() + &toml::ser::to_string_pretty(self)?;
        std::fs::write(preferences, string)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::Preferences;

    #[test]
    fn partial_file() {
        let preferences: Preferences = toml::from_str(
            r#"
            show_grid = true
            [zoom_limits]
            max = 200
            "#,
        )
        .unwrap();
        assert!(preferences.show_grid);
        assert_eq!(preferences.zoom, 100);
        assert_eq!(preferences.zoom_limits.max, 200);
        assert_eq!(preferences.zoom_limits.step, 10);
        assert!(!preferences.did_fail_to_load());
    }
    #[test]
    fn missing_file_defaults() {
        let path = std::env::temp_dir().join("badgewright-no-such-preferences.toml");
        let preferences = Preferences::load_or_default(&path);
        assert!(preferences.did_fail_to_load());
        assert_eq!(preferences.view(), Preferences::default().view());
    }
    #[test]
    fn zoom_clamped_into_view() {
        let preferences: Preferences = toml::from_str("zoom = 5000").unwrap();
        assert_eq!(preferences.view().zoom, 400);
    }
    #[test]
    fn documented_output_parses() {
        let string = super::DOCUMENTATION.to_owned()
            + &toml::ser::to_string_pretty(&Preferences::default()).unwrap();
        let back: Preferences = toml::from_str(&string).unwrap();
        assert_eq!(back, Preferences::default());
    }
}
