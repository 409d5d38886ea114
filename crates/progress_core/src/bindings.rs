use std::fmt;

use crate::ProgressView;

pub type TextBinding = Box<dyn Fn(&str) + Send>;
pub type CountBinding = Box<dyn Fn(u64) + Send>;
pub type VisibilityBinding = Box<dyn Fn(bool) + Send>;

/// Logical UI roles a monitor can render into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    StatusText,
    ScannedCount,
    ScanPanelVisible,
    MediaPanelVisible,
    MediaProcessed,
    MediaTotal,
    ErrorDetail,
    Navigate,
}

/// Render callbacks supplied by the host, one optional slot per [`Role`].
///
/// Unbound roles are skipped when rendering. Only `status_text` is required.
#[derive(Default)]
pub struct UiBindings {
    pub status_text: Option<TextBinding>,
    pub scanned_count: Option<CountBinding>,
    pub scan_panel_visible: Option<VisibilityBinding>,
    pub media_panel_visible: Option<VisibilityBinding>,
    pub media_processed: Option<CountBinding>,
    pub media_total: Option<CountBinding>,
    pub error_detail: Option<TextBinding>,
    pub navigate: Option<TextBinding>,
}

impl UiBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status_text(mut self, f: impl Fn(&str) + Send + 'static) -> Self {
        self.status_text = Some(Box::new(f));
        self
    }

    pub fn with_scanned_count(mut self, f: impl Fn(u64) + Send + 'static) -> Self {
        self.scanned_count = Some(Box::new(f));
        self
    }

    pub fn with_scan_panel_visible(mut self, f: impl Fn(bool) + Send + 'static) -> Self {
        self.scan_panel_visible = Some(Box::new(f));
        self
    }

    pub fn with_media_panel_visible(mut self, f: impl Fn(bool) + Send + 'static) -> Self {
        self.media_panel_visible = Some(Box::new(f));
        self
    }

    pub fn with_media_processed(mut self, f: impl Fn(u64) + Send + 'static) -> Self {
        self.media_processed = Some(Box::new(f));
        self
    }

    pub fn with_media_total(mut self, f: impl Fn(u64) + Send + 'static) -> Self {
        self.media_total = Some(Box::new(f));
        self
    }

    pub fn with_error_detail(mut self, f: impl Fn(&str) + Send + 'static) -> Self {
        self.error_detail = Some(Box::new(f));
        self
    }

    pub fn with_navigate(mut self, f: impl Fn(&str) + Send + 'static) -> Self {
        self.navigate = Some(Box::new(f));
        self
    }

    pub fn is_bound(&self, role: Role) -> bool {
        match role {
            Role::StatusText => self.status_text.is_some(),
            Role::ScannedCount => self.scanned_count.is_some(),
            Role::ScanPanelVisible => self.scan_panel_visible.is_some(),
            Role::MediaPanelVisible => self.media_panel_visible.is_some(),
            Role::MediaProcessed => self.media_processed.is_some(),
            Role::MediaTotal => self.media_total.is_some(),
            Role::ErrorDetail => self.error_detail.is_some(),
            Role::Navigate => self.navigate.is_some(),
        }
    }

    pub fn unbound_roles(&self) -> Vec<Role> {
        [
            Role::StatusText,
            Role::ScannedCount,
            Role::ScanPanelVisible,
            Role::MediaPanelVisible,
            Role::MediaProcessed,
            Role::MediaTotal,
            Role::ErrorDetail,
            Role::Navigate,
        ]
        .into_iter()
        .filter(|role| !self.is_bound(*role))
        .collect()
    }

    /// Pushes every rendered field of `view` into its binding.
    ///
    /// Writes whole values, so repeating a render with the same view is harmless.
    pub(crate) fn render(&self, view: &ProgressView) {
        if let Some(f) = &self.status_text {
            f(&view.status_text);
        }
        if let (Some(f), Some(count)) = (&self.scanned_count, view.scanned_count) {
            f(count);
        }
        if let Some(f) = &self.scan_panel_visible {
            f(view.scan_panel_visible);
        }
        if let Some(f) = &self.media_panel_visible {
            f(view.media_panel_visible);
        }
        if let (Some(f), Some(total)) = (&self.media_total, view.media_total) {
            f(total);
        }
        if let (Some(f), Some(processed)) = (&self.media_processed, view.media_processed) {
            f(processed);
        }
        if let (Some(f), Some(message)) = (&self.error_detail, view.last_error.as_deref()) {
            f(message);
        }
    }

    pub(crate) fn navigate(&self, location: &str) -> bool {
        match &self.navigate {
            Some(f) => {
                f(location);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for UiBindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiBindings")
            .field("unbound", &self.unbound_roles())
            .finish()
    }
}
