use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use localization_error::{AngleRepresentation, AngleUnit, DistanceUnit, ErrorComputer};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use toml::Value;
use tracing::debug;

use crate::{utils, Error};

const SEPARATORS: &[char] = &['\n', ';'];

/// Parameters of the localization error estimator. Frozen once the
/// estimator is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct LocalizationErrorConfig {
    /// Report orientation errors as roll/pitch/yaw differences instead of a
    /// single quaternion angle.
    #[serde(default = "default_true")]
    pub use_roll_pitch_yaw_angles: bool,
    /// Report angles in degrees instead of radians.
    #[serde(default = "default_true")]
    pub use_degrees_in_angles: bool,
    /// Report distances in millimeters instead of meters.
    #[serde(default = "default_true")]
    pub use_millimeters_in_distances: bool,
    /// Publish ticks per second.
    #[serde(default = "default_publish_rate")]
    pub publish_rate: f64,
    #[serde(default = "default_map_frame_id")]
    pub map_frame_id: String,
    #[serde(default = "default_base_link_frame_id")]
    pub base_link_frame_id: String,
    /// Minimum number of received poses before a tick publishes. `0` publishes
    /// on every tick, even when nothing was received.
    #[serde(default = "default_pose_publishers_sampling_rate")]
    pub pose_publishers_sampling_rate: i64,
    #[serde(default = "default_oracle_timeout_secs")]
    pub oracle_timeout_secs: f64,
    /// Link queried from the ground-truth provider. Defaults to `base_link_frame_id`.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_name: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_publish_rate() -> f64 {
    1.0
}

fn default_map_frame_id() -> String {
    "map".to_owned()
}

fn default_base_link_frame_id() -> String {
    "base_link".to_owned()
}

fn default_pose_publishers_sampling_rate() -> i64 {
    1
}

fn default_oracle_timeout_secs() -> f64 {
    1.0
}

impl Default for LocalizationErrorConfig {
    fn default() -> Self {
        Self {
            use_roll_pitch_yaw_angles: default_true(),
            use_degrees_in_angles: default_true(),
            use_millimeters_in_distances: default_true(),
            publish_rate: default_publish_rate(),
            map_frame_id: default_map_frame_id(),
            base_link_frame_id: default_base_link_frame_id(),
            pose_publishers_sampling_rate: default_pose_publishers_sampling_rate(),
            oracle_timeout_secs: default_oracle_timeout_secs(),
            link_name: None,
        }
    }
}

fn non_zero_duration(secs: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(secs)
        .ok()
        .filter(|d| !d.is_zero())
}

fn invalid(field: &str, message: impl Into<String>) -> localization_error::Error {
    localization_error::Error::ConfigurationInvalid {
        field: field.to_owned(),
        message: message.into(),
    }
}

impl LocalizationErrorConfig {
    pub fn try_new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Self::from_str(
            &std::fs::read_to_string(&path)
                .map_err(|e| Error::NoFile(path.as_ref().to_owned(), e))?,
            &path,
        )
    }

    /// Loads the config at `config`, or at `LOCALIZATION_ERROR_CONFIG_PATH`
    /// when `config` is `None`, and applies the override `scripts`. Without
    /// either path the defaults are used.
    pub fn try_load(config: Option<PathBuf>, scripts: &str) -> Result<Self, Error> {
        match utils::config_path(config) {
            Some(path) => {
                let s = std::fs::read_to_string(&path)
                    .map_err(|e| Error::NoFile(path.clone(), e))?;
                Self::from_str_with_overrides(&s, &path, scripts)
            }
            None => Self::from_str_with_overrides("", PathBuf::new(), scripts),
        }
    }

    pub fn from_str<P: AsRef<Path>>(s: &str, path: P) -> Result<Self, Error> {
        Self::from_str_with_overrides(s, path, "")
    }

    /// Parses `s` after applying the parameter override `scripts` to it.
    ///
    /// Scripts are `key = value` assignments separated by newlines or `;`.
    /// `key =` removes the key so that its default applies.
    pub fn from_str_with_overrides<P: AsRef<Path>>(
        s: &str,
        path: P,
        scripts: &str,
    ) -> Result<Self, Error> {
        let mut doc: Value =
            toml::from_str(s).map_err(|e| Error::TomlParseFailure(path.as_ref().to_owned(), e))?;
        apply_overrides(&mut doc, scripts)?;
        let config: Self = doc
            .try_into()
            .map_err(|e| Error::TomlParseFailure(path.as_ref().to_owned(), e))?;
        debug!("{:?}", config);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), localization_error::Error> {
        self.publish_period()?;
        if self.map_frame_id.is_empty() {
            return Err(invalid("map_frame_id", "must not be empty"));
        }
        if self.base_link_frame_id.is_empty() {
            return Err(invalid("base_link_frame_id", "must not be empty"));
        }
        if self.pose_publishers_sampling_rate < 0 {
            return Err(invalid(
                "pose_publishers_sampling_rate",
                format!(
                    "must not be negative, got {}",
                    self.pose_publishers_sampling_rate
                ),
            ));
        }
        self.oracle_timeout()?;
        if matches!(&self.link_name, Some(name) if name.is_empty()) {
            return Err(invalid("link_name", "must not be empty"));
        }
        Ok(())
    }

    pub fn angle_representation(&self) -> AngleRepresentation {
        if self.use_roll_pitch_yaw_angles {
            AngleRepresentation::RollPitchYaw
        } else {
            AngleRepresentation::Quaternion
        }
    }

    pub fn angle_unit(&self) -> AngleUnit {
        if self.use_degrees_in_angles {
            AngleUnit::Degrees
        } else {
            AngleUnit::Radians
        }
    }

    pub fn distance_unit(&self) -> DistanceUnit {
        if self.use_millimeters_in_distances {
            DistanceUnit::Millimeters
        } else {
            DistanceUnit::Meters
        }
    }

    pub fn error_computer(&self) -> ErrorComputer {
        ErrorComputer::new(
            self.angle_representation(),
            self.angle_unit(),
            self.distance_unit(),
        )
    }

    /// Interval between publish ticks.
    ///
    /// Fails unless `publish_rate` is positive and gives a non-zero period
    /// that fits in a [`Duration`].
    pub fn publish_period(&self) -> Result<Duration, localization_error::Error> {
        if self.publish_rate.is_nan() || self.publish_rate <= 0.0 {
            return Err(invalid(
                "publish_rate",
                format!("must be a positive number of Hz, got {}", self.publish_rate),
            ));
        }
        non_zero_duration(1.0 / self.publish_rate).ok_or_else(|| {
            invalid(
                "publish_rate",
                format!("{} Hz has no representable period", self.publish_rate),
            )
        })
    }

    pub fn oracle_timeout(&self) -> Result<Duration, localization_error::Error> {
        if self.oracle_timeout_secs.is_nan() || self.oracle_timeout_secs <= 0.0 {
            return Err(invalid(
                "oracle_timeout_secs",
                format!("must be positive, got {}", self.oracle_timeout_secs),
            ));
        }
        non_zero_duration(self.oracle_timeout_secs).ok_or_else(|| {
            invalid(
                "oracle_timeout_secs",
                format!("{} seconds is out of range", self.oracle_timeout_secs),
            )
        })
    }

    pub fn sampling_threshold(&self) -> usize {
        self.pose_publishers_sampling_rate.max(0) as usize
    }

    pub fn link_name(&self) -> &str {
        self.link_name.as_deref().unwrap_or(&self.base_link_frame_id)
    }
}

#[derive(Debug, PartialEq)]
enum Operation {
    Set(Value),
    Delete,
}

fn split_scripts(s: &str) -> Result<Vec<&str>, Error> {
    let mut scripts = vec![];
    let mut quote = None;
    let mut start = 0;
    for (i, ch) in s.char_indices() {
        match (quote, ch) {
            (None, '"' | '\'') => quote = Some(ch),
            (Some(q), _) if q == ch => quote = None,
            (None, _) if SEPARATORS.contains(&ch) => {
                scripts.push(&s[start..i]);
                start = i + ch.len_utf8();
            }
            _ => {}
        }
    }
    if let Some(q) = quote {
        return Err(Error::InvalidOverride(
            s.to_owned(),
            format!("unexpected eof, expected `{q}`"),
        ));
    }
    scripts.push(&s[start..]);
    Ok(scripts.into_iter().filter(|s| !s.trim().is_empty()).collect())
}

fn parse_scripts(s: &str) -> Result<Vec<(String, Operation)>, Error> {
    let mut parsed = vec![];
    for script in split_scripts(s)? {
        let (key, value) = script.split_once('=').ok_or_else(|| {
            Error::InvalidOverride(script.to_owned(), "expected `=`".to_owned())
        })?;
        let key = key.trim();
        if key.is_empty() || key.contains(char::is_whitespace) {
            return Err(Error::InvalidOverride(
                script.to_owned(),
                "expected a parameter name".to_owned(),
            ));
        }
        let value = value.trim();
        let operation = if value.is_empty() {
            Operation::Delete
        } else {
            let mut doc: Value = toml::from_str(&format!("a = {value}"))
                .map_err(|e| Error::InvalidOverride(script.to_owned(), e.to_string()))?;
            match doc.as_table_mut().and_then(|t| t.remove("a")) {
                Some(v) => Operation::Set(v),
                None => {
                    return Err(Error::InvalidOverride(
                        script.to_owned(),
                        "missing value".to_owned(),
                    ))
                }
            }
        };
        parsed.push((key.to_owned(), operation));
    }
    Ok(parsed)
}

fn apply_overrides(doc: &mut Value, scripts: &str) -> Result<(), Error> {
    let table = doc.as_table_mut().ok_or_else(|| {
        Error::InvalidOverride(scripts.to_owned(), "document is not a table".to_owned())
    })?;
    for (key, operation) in parse_scripts(scripts)? {
        match operation {
            Operation::Set(value) => {
                debug!(?key, ?value, "executing set operation");
                table.insert(key, value);
            }
            Operation::Delete => {
                debug!(?key, "executing delete operation");
                table.remove(&key);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    #[test]
    fn test_parse_scripts() {
        let f = |s: &str| parse_scripts(s).unwrap();
        assert!(f("").is_empty());
        assert!(f("\n").is_empty());
        assert!(f(";;").is_empty());

        assert!(parse_scripts("a").is_err());
        assert!(parse_scripts("a=b").is_err());
        assert!(parse_scripts("=1").is_err());
        assert!(parse_scripts(r#"a="b"#).is_err());

        assert_eq!(
            f("publish_rate = 10.0"),
            vec![("publish_rate".to_owned(), Operation::Set(Value::Float(10.0)))]
        );
        assert_eq!(
            f(r#"map_frame_id = "a;b""#),
            vec![(
                "map_frame_id".to_owned(),
                Operation::Set(Value::String("a;b".to_owned()))
            )]
        );
        assert_eq!(
            f("a = 1;b =\nc = true"),
            vec![
                ("a".to_owned(), Operation::Set(Value::Integer(1))),
                ("b".to_owned(), Operation::Delete),
                ("c".to_owned(), Operation::Set(Value::Boolean(true))),
            ]
        );
    }

    #[test]
    fn test_default() {
        let config = LocalizationErrorConfig::from_str("", "a.toml").unwrap();
        assert_eq!(config, LocalizationErrorConfig::default());
        assert!(config.validate().is_ok());
        assert_eq!(config.link_name(), "base_link");
        assert_eq!(config.publish_period().unwrap(), Duration::from_secs(1));
        assert_eq!(config.sampling_threshold(), 1);
        assert_eq!(config.angle_representation(), AngleRepresentation::RollPitchYaw);
        assert_eq!(config.angle_unit(), AngleUnit::Degrees);
        assert_eq!(config.distance_unit(), DistanceUnit::Millimeters);
    }

    #[test]
    fn test_from_str() {
        let s = r#"
use_roll_pitch_yaw_angles = false
use_degrees_in_angles = false
use_millimeters_in_distances = false
publish_rate = 4.0
map_frame_id = "world"
base_link_frame_id = "robot/base_link"
pose_publishers_sampling_rate = 5
oracle_timeout_secs = 0.25
link_name = "robot::base_footprint"
"#;
        let config = LocalizationErrorConfig::from_str(s, "a.toml").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.angle_representation(), AngleRepresentation::Quaternion);
        assert_eq!(config.angle_unit(), AngleUnit::Radians);
        assert_eq!(config.distance_unit(), DistanceUnit::Meters);
        assert_approx_eq!(config.publish_period().unwrap().as_secs_f64(), 0.25);
        assert_eq!(config.map_frame_id, "world");
        assert_eq!(config.link_name(), "robot::base_footprint");
        assert_eq!(config.sampling_threshold(), 5);
        assert_eq!(config.oracle_timeout().unwrap(), Duration::from_millis(250));
    }

    #[test]
    fn test_unknown_field() {
        let err = LocalizationErrorConfig::from_str("publish_hz = 1.0", "a.toml").unwrap_err();
        assert!(matches!(err, Error::TomlParseFailure(..)));
    }

    #[test]
    fn test_overrides() {
        let s = "publish_rate = 2.0\nmap_frame_id = \"odom\"";
        let config = LocalizationErrorConfig::from_str_with_overrides(
            s,
            "a.toml",
            "publish_rate = 20.0; map_frame_id =; use_degrees_in_angles = false",
        )
        .unwrap();
        assert_approx_eq!(config.publish_rate, 20.0);
        assert_eq!(config.map_frame_id, "map");
        assert!(!config.use_degrees_in_angles);

        assert!(matches!(
            LocalizationErrorConfig::from_str_with_overrides(s, "a.toml", "publish_rate"),
            Err(Error::InvalidOverride(..))
        ));
        assert!(matches!(
            LocalizationErrorConfig::from_str_with_overrides(s, "a.toml", "rate = 1.0"),
            Err(Error::TomlParseFailure(..))
        ));
    }

    #[test]
    fn test_validate() {
        let check = |f: fn(&mut LocalizationErrorConfig), field: &str| {
            let mut config = LocalizationErrorConfig::default();
            f(&mut config);
            match config.validate() {
                Err(localization_error::Error::ConfigurationInvalid { field: name, .. }) => {
                    assert_eq!(name, field)
                }
                other => panic!("expected invalid {field}, got {other:?}"),
            }
        };
        check(|c| c.publish_rate = 0.0, "publish_rate");
        check(|c| c.publish_rate = -1.0, "publish_rate");
        check(|c| c.publish_rate = f64::NAN, "publish_rate");
        check(|c| c.map_frame_id.clear(), "map_frame_id");
        check(|c| c.base_link_frame_id.clear(), "base_link_frame_id");
        check(
            |c| c.pose_publishers_sampling_rate = -1,
            "pose_publishers_sampling_rate",
        );
        check(|c| c.publish_rate = f64::INFINITY, "publish_rate");
        check(|c| c.publish_rate = 1e-300, "publish_rate");
        check(|c| c.publish_rate = 1e12, "publish_rate");
        check(|c| c.oracle_timeout_secs = 0.0, "oracle_timeout_secs");
        check(|c| c.oracle_timeout_secs = f64::NAN, "oracle_timeout_secs");
        check(|c| c.oracle_timeout_secs = 1e300, "oracle_timeout_secs");
        check(|c| c.oracle_timeout_secs = 1e-12, "oracle_timeout_secs");
        check(|c| c.link_name = Some(String::new()), "link_name");

        let config = LocalizationErrorConfig {
            pose_publishers_sampling_rate: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.sampling_threshold(), 0);
    }
}
