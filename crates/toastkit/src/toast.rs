//! The toast record and the factory that builds it.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::id;
use crate::value::ValueOrFn;

/// Message carried by a toast: fixed text or text derived from the toast.
pub type ToastMessage = ValueOrFn<String, Toast>;

/// Kind of toast. Drives the default duration and how a renderer styles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastType {
    #[default]
    Blank,
    Error,
    Success,
    Loading,
    Custom,
}

impl ToastType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blank => "blank",
            Self::Error => "error",
            Self::Success => "success",
            Self::Loading => "loading",
            Self::Custom => "custom",
        }
    }
}

/// ARIA role the renderer should put on the toast element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Status,
    Alert,
}

/// ARIA live-region politeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AriaLive {
    #[default]
    Polite,
    Assertive,
    Off,
}

/// Screen position hint. Opaque to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToastPosition {
    TopLeft,
    TopCenter,
    TopRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

/// Icon colour pair. Opaque to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconTheme {
    pub primary: String,
    pub secondary: String,
}

/// Default auto-dismiss durations in milliseconds, per toast type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DurationDefaults {
    pub blank: u64,
    pub error: u64,
    pub success: u64,
    pub loading: u64,
    pub custom: u64,
}

/// Duration used for any type without a more specific default.
pub const FALLBACK_DURATION_MS: u64 = 4_000;

impl Default for DurationDefaults {
    fn default() -> Self {
        Self {
            blank: 4_000,
            error: 4_000,
            success: 2_000,
            loading: 30_000,
            custom: FALLBACK_DURATION_MS,
        }
    }
}

impl DurationDefaults {
    pub fn for_type(&self, kind: ToastType) -> u64 {
        match kind {
            ToastType::Blank => self.blank,
            ToastType::Error => self.error,
            ToastType::Success => self.success,
            ToastType::Loading => self.loading,
            ToastType::Custom => self.custom,
        }
    }
}

/// Caller overrides applied on top of the factory defaults.
///
/// Every `Some` field wins over the computed default. `created_at` and
/// `visible` are deliberately absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToastOptions {
    pub id: Option<String>,
    pub duration: Option<u64>,
    pub role: Option<Role>,
    pub aria_live: Option<AriaLive>,
    pub icon: Option<String>,
    pub icon_theme: Option<IconTheme>,
    pub class_name: Option<String>,
    pub style: Option<serde_json::Value>,
    pub position: Option<ToastPosition>,
}

impl ToastOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration = Some(duration_ms);
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_aria_live(mut self, aria_live: AriaLive) -> Self {
        self.aria_live = Some(aria_live);
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn with_style(mut self, style: serde_json::Value) -> Self {
        self.style = Some(style);
        self
    }

    pub fn with_position(mut self, position: ToastPosition) -> Self {
        self.position = Some(position);
        self
    }

    /// Field-wise merge where `over` wins wherever it is set.
    pub fn merged(&self, over: &ToastOptions) -> ToastOptions {
        ToastOptions {
            id: over.id.clone().or_else(|| self.id.clone()),
            duration: over.duration.or(self.duration),
            role: over.role.or(self.role),
            aria_live: over.aria_live.or(self.aria_live),
            icon: over.icon.clone().or_else(|| self.icon.clone()),
            icon_theme: over.icon_theme.clone().or_else(|| self.icon_theme.clone()),
            class_name: over.class_name.clone().or_else(|| self.class_name.clone()),
            style: over.style.clone().or_else(|| self.style.clone()),
            position: over.position.or(self.position),
        }
    }
}

/// A single notification record.
#[derive(Debug, Clone, Serialize)]
pub struct Toast {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ToastType,
    pub message: ToastMessage,
    pub created_at: DateTime<Utc>,
    /// When the auto-dismiss timer last started. Set by the factory and taken
    /// from the incoming record on every upsert.
    pub updated_at: DateTime<Utc>,
    pub visible: bool,
    /// Auto-dismiss delay in milliseconds. `0` means the toast stays until
    /// dismissed.
    pub duration: u64,
    /// Milliseconds this toast spent paused since `updated_at`.
    pub pause_duration: u64,
    pub role: Role,
    pub aria_live: AriaLive,
    pub icon: Option<String>,
    pub icon_theme: Option<IconTheme>,
    pub class_name: Option<String>,
    pub style: Option<serde_json::Value>,
    pub position: Option<ToastPosition>,
    /// Rendered height reported back by the renderer.
    pub height: Option<f64>,
}

impl Toast {
    /// Build a toast using the built-in per-type durations.
    pub fn create(
        message: impl Into<ToastMessage>,
        kind: ToastType,
        options: ToastOptions,
    ) -> Toast {
        Self::create_with(message, kind, options, &DurationDefaults::default())
    }

    /// Build a toast using `defaults` for the per-type duration.
    ///
    /// An empty caller id counts as absent and a fresh one is generated.
    pub fn create_with(
        message: impl Into<ToastMessage>,
        kind: ToastType,
        options: ToastOptions,
        defaults: &DurationDefaults,
    ) -> Toast {
        let ToastOptions {
            id,
            duration,
            role,
            aria_live,
            icon,
            icon_theme,
            class_name,
            style,
            position,
        } = options;
        let now = Utc::now();

        Toast {
            id: id.filter(|id| !id.is_empty()).unwrap_or_else(id::generate),
            kind,
            message: message.into(),
            created_at: now,
            updated_at: now,
            visible: true,
            duration: duration.unwrap_or_else(|| defaults.for_type(kind)),
            pause_duration: 0,
            role: role.unwrap_or_default(),
            aria_live: aria_live.unwrap_or_default(),
            icon,
            icon_theme,
            class_name,
            style,
            position,
            height: None,
        }
    }

    /// Resolve the message text against this toast.
    pub fn render_message(&self) -> String {
        self.message.resolve(self)
    }

    /// When this toast should auto-dismiss, or `None` if it never does.
    ///
    /// Durations too large to represent as a timestamp never expire.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        if self.duration == 0 {
            return None;
        }
        let total = i64::try_from(self.duration.saturating_add(self.pause_duration)).ok()?;
        self.updated_at
            .checked_add_signed(Duration::try_milliseconds(total)?)
    }

    /// Merge this (incoming) record over `previous` with the same id.
    ///
    /// Incoming fields win. `created_at` always comes from `previous`, and
    /// pass-through fields the incoming record leaves unset keep their
    /// previous value. The timer restarts from the incoming `updated_at` with
    /// no paused time.
    pub(crate) fn merged_over(self, previous: &Toast) -> Toast {
        Toast {
            created_at: previous.created_at,
            icon: self.icon.or_else(|| previous.icon.clone()),
            icon_theme: self.icon_theme.or_else(|| previous.icon_theme.clone()),
            class_name: self.class_name.or_else(|| previous.class_name.clone()),
            style: self.style.or_else(|| previous.style.clone()),
            position: self.position.or(previous.position),
            height: self.height.or(previous.height),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_durations_per_type() {
        let duration = |kind| Toast::create("m", kind, ToastOptions::new()).duration;

        assert_eq!(duration(ToastType::Success), 2_000);
        assert_eq!(duration(ToastType::Error), 4_000);
        assert_eq!(duration(ToastType::Loading), 30_000);
        assert_eq!(duration(ToastType::Blank), 4_000);
        assert_eq!(duration(ToastType::Custom), FALLBACK_DURATION_MS);
    }

    #[test]
    fn factory_applies_accessibility_defaults() {
        let toast = Toast::create("hello", ToastType::Blank, ToastOptions::new());

        assert!(toast.visible);
        assert_eq!(toast.role, Role::Status);
        assert_eq!(toast.aria_live, AriaLive::Polite);
        assert_eq!(toast.pause_duration, 0);
        assert_eq!(toast.render_message(), "hello");
        assert!(!toast.id.is_empty());
    }

    #[test]
    fn options_override_defaults() {
        let options = ToastOptions::new()
            .with_id("save")
            .with_duration(0)
            .with_role(Role::Alert)
            .with_aria_live(AriaLive::Assertive)
            .with_icon("💾")
            .with_position(ToastPosition::BottomRight);

        let toast = Toast::create("saved", ToastType::Success, options);

        assert_eq!(toast.id, "save");
        assert_eq!(toast.duration, 0);
        assert_eq!(toast.role, Role::Alert);
        assert_eq!(toast.aria_live, AriaLive::Assertive);
        assert_eq!(toast.icon.as_deref(), Some("💾"));
        assert_eq!(toast.position, Some(ToastPosition::BottomRight));
        assert!(toast.expires_at().is_none());
    }

    #[test]
    fn empty_id_is_replaced_by_generated_one() {
        let toast = Toast::create("m", ToastType::Blank, ToastOptions::new().with_id(""));
        assert!(!toast.id.is_empty());
    }

    #[test]
    fn computed_message_sees_the_toast() {
        let message = ToastMessage::from_fn(|t: &Toast| format!("{} toast", t.kind.as_str()));
        let toast = Toast::create(message, ToastType::Error, ToastOptions::new());
        assert_eq!(toast.render_message(), "error toast");
    }

    #[test]
    fn merged_options_prefer_override() {
        let base = ToastOptions::new().with_duration(10).with_icon("a");
        let over = ToastOptions::new().with_duration(20);

        let merged = base.merged(&over);
        assert_eq!(merged.duration, Some(20));
        assert_eq!(merged.icon.as_deref(), Some("a"));
    }

    #[test]
    fn merge_keeps_created_at_and_unset_pass_through() {
        let mut previous = Toast::create(
            "old",
            ToastType::Loading,
            ToastOptions::new().with_id("x").with_icon("spinner"),
        );
        previous.created_at = Utc::now() - Duration::seconds(30);
        previous.updated_at = previous.created_at;
        previous.pause_duration = 500;

        let incoming = Toast::create("new", ToastType::Success, ToastOptions::new().with_id("x"));
        let merged = incoming.merged_over(&previous);

        assert_eq!(merged.created_at, previous.created_at);
        assert!(merged.updated_at > previous.updated_at);
        assert_eq!(merged.pause_duration, 0);
        assert_eq!(merged.kind, ToastType::Success);
        assert_eq!(merged.render_message(), "new");
        assert_eq!(merged.icon.as_deref(), Some("spinner"));
    }

    #[test]
    fn expiry_includes_pause_duration() {
        let mut toast = Toast::create("m", ToastType::Success, ToastOptions::new());
        toast.pause_duration = 1_000;

        let expires = toast.expires_at().unwrap();
        assert_eq!(expires - toast.updated_at, Duration::milliseconds(3_000));
    }

    #[test]
    fn replacement_restarts_the_timer() {
        let mut loading = Toast::create("l", ToastType::Loading, ToastOptions::new().with_id("op"));
        loading.created_at = Utc::now() - Duration::milliseconds(2_100);
        loading.updated_at = loading.created_at;

        let success = Toast::create("s", ToastType::Success, ToastOptions::new().with_id("op"));
        let merged = success.merged_over(&loading);

        let expires = merged.expires_at().unwrap();
        assert_eq!(merged.created_at, loading.created_at);
        assert!(expires > Utc::now());
        assert_eq!(expires - merged.updated_at, Duration::milliseconds(2_000));
    }

    #[test]
    fn huge_duration_never_expires() {
        let options = ToastOptions::new().with_duration(u64::MAX);
        let toast = Toast::create("m", ToastType::Blank, options);
        assert!(toast.expires_at().is_none());
    }

    #[test]
    fn toast_serializes_for_renderers() {
        let toast = Toast::create("hi", ToastType::Success, ToastOptions::new().with_id("t1"));
        let json = serde_json::to_value(&toast).unwrap();

        assert_eq!(json["id"], "t1");
        assert_eq!(json["type"], "success");
        assert_eq!(json["message"], "hi");
        assert_eq!(json["role"], "status");
        assert_eq!(json["aria_live"], "polite");
    }
}
