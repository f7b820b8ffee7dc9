use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::error::EditorResult;
use crate::inserter::PasteMode;

/// Size used when no valid `default_size` is configured
pub const FALLBACK_SIZE: (u32, u32) = (600, 400);

/// Editor settings supplied by the host.
///
/// Every field has a default, so a host can pass a partial JSON document and
/// only override what it cares about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum number of retained history entries beyond the baseline
    pub worklog_limit: usize,
    /// Block size used by pixelize, see [`PixelSize`]
    pub pixelize_pixel_size: String,
    pub default_line_width: f32,
    pub default_arrow_length: f32,
    pub default_eraser_width: f32,
    pub default_shadow_on: bool,
    /// Multiplier applied to the logarithmic arrow shadow blur
    pub shadow_scale: f32,
    pub line_color: Color32,
    pub fill_color: Color32,
    pub background_color: Color32,
    /// Replace the whole surface when an image is opened into an untouched editor
    pub replace_all_on_empty_background: bool,
    /// Paste modes offered when an image is opened
    pub paste_actions: Vec<PasteMode>,
    /// Longest side of the low resolution preview shown while dragging a placed image
    pub placement_proxy_max_side: u32,
    pub max_width: u32,
    pub max_height: u32,
    /// Initial surface size as `"<w>x<h>"`
    pub default_size: Option<String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            worklog_limit: 25,
            pixelize_pixel_size: "20".to_owned(),
            default_line_width: 3.0,
            default_arrow_length: 20.0,
            default_eraser_width: 5.0,
            default_shadow_on: true,
            shadow_scale: 1.0,
            line_color: Color32::BLACK,
            fill_color: Color32::TRANSPARENT,
            background_color: Color32::WHITE,
            replace_all_on_empty_background: false,
            paste_actions: PasteMode::ALL.to_vec(),
            placement_proxy_max_side: 1000,
            max_width: 10000,
            max_height: 13000,
            default_size: None,
        }
    }
}

impl EditorConfig {
    /// Parse a (possibly partial) JSON configuration document
    pub fn from_json(json: &str) -> EditorResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Initial surface size, falling back to [`FALLBACK_SIZE`] when
    /// `default_size` is missing or malformed
    pub fn initial_size(&self) -> (u32, u32) {
        self.default_size
            .as_deref()
            .and_then(parse_size)
            .map(|(w, h)| (w.min(self.max_width), h.min(self.max_height)))
            .unwrap_or(FALLBACK_SIZE)
    }

    /// The pixelize block size currently configured
    pub fn pixel_size(&self) -> PixelSize {
        PixelSize::parse(&self.pixelize_pixel_size)
    }
}

fn parse_size(spec: &str) -> Option<(u32, u32)> {
    let (w, h) = spec.trim().split_once(['x', 'X'])?;
    let w: u32 = w.trim().parse().ok()?;
    let h: u32 = h.trim().parse().ok()?;
    (w > 0 && h > 0).then_some((w, h))
}

/// Smallest block length pixelize will use
pub const MIN_PIXEL_SIZE: f32 = 2.0;

/// Pixelize block size as typed by the user.
///
/// `"12"` and `"12px"` are absolute lengths, `"10%"` is a fraction of the
/// shorter selection side. Anything else behaves like `"1"`, which then
/// clamps to [`MIN_PIXEL_SIZE`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PixelSize {
    Pixels(u32),
    Percent(u32),
}

impl PixelSize {
    pub fn parse(spec: &str) -> Self {
        let spec = spec.trim();
        if let Some(pct) = spec.strip_suffix('%') {
            return match leading_int(pct) {
                Some(p) if p > 0 => PixelSize::Percent(p),
                _ => PixelSize::Percent(100),
            };
        }
        let lower = spec.to_ascii_lowercase();
        let digits = lower.strip_suffix("px").unwrap_or(&lower);
        match leading_int(digits) {
            Some(p) if p > 0 => PixelSize::Pixels(p),
            _ => PixelSize::Pixels(1),
        }
    }

    /// Settings dialog check: only `^\d+$` and `^\d+%$` with a non-zero value
    /// are accepted. Returns the normalized spec string.
    pub fn validate(input: &str) -> Option<String> {
        let input = input.trim();
        let (digits, suffix) = match input.strip_suffix('%') {
            Some(d) => (d.trim(), "%"),
            None => (input, ""),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        match digits.parse::<u64>() {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(format!("{digits}{suffix}")),
        }
    }

    /// Block length for a selection of the given size, clamped to the minimum
    pub fn resolve(self, width: u32, height: u32) -> f32 {
        let size = match self {
            PixelSize::Pixels(px) => px as f32,
            PixelSize::Percent(pct) => width.min(height) as f32 * pct as f32 / 100.0,
        };
        size.max(MIN_PIXEL_SIZE)
    }
}

/// The leading run of digits, if any
fn leading_int(s: &str) -> Option<u32> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s[..end].parse().ok()
}
