//! Signal collectors: one per measurement vector.
//!
//! Each collector reads its surface through the (possibly defended) host
//! environment and produces a salted digest, so identical raw readings yield
//! different signal values under different salts. Collectors never fail: an
//! absent capability yields the `"unsupported"` sentinel and a refused read
//! yields `"denied"`. One broken vector never aborts the pass.

use sha2::{Digest, Sha256};

use crate::platform::{GpuParameter, GpuParameterValue, HostEnvironment};
use crate::profile::FONT_PROBE_TEXT;
use crate::signal::{FingerprintSignal, SignalValue, Vector};

/// Salted SHA-256 digest of a raw reading, hex-encoded (64 chars).
fn salted_digest(raw: &[u8], salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(raw);
    hex::encode(hasher.finalize())
}

/// Short per-entry digest for list-valued signals.
fn salted_entry_digest(raw: &str, salt: &str) -> String {
    let mut digest = salted_digest(raw.as_bytes(), salt);
    digest.truncate(16);
    digest
}

fn denied(vector: Vector, failure: impl std::fmt::Display) -> FingerprintSignal {
    log::debug!("{} read failed: {failure}", vector.id());
    FingerprintSignal::denied(vector)
}

pub fn collect_canvas(host: &HostEnvironment, salt: &str) -> FingerprintSignal {
    let Some(surface) = host.rendering.as_deref() else {
        return FingerprintSignal::unsupported(Vector::Canvas);
    };
    match surface.read_pixels() {
        Ok(pixels) => FingerprintSignal::measured(
            Vector::Canvas,
            SignalValue::Text(salted_digest(&pixels, salt)),
        ),
        Err(failure) => denied(Vector::Canvas, failure),
    }
}

pub fn collect_webgl(host: &HostEnvironment, salt: &str) -> FingerprintSignal {
    let Some(gpu) = host.gpu.as_deref() else {
        return FingerprintSignal::unsupported(Vector::Webgl);
    };
    let mut readings = String::new();
    for param in GpuParameter::ALL {
        match gpu.get_parameter(param) {
            Ok(GpuParameterValue::Text(s)) => readings.push_str(&s),
            Ok(GpuParameterValue::Size(v)) => readings.push_str(&v.to_string()),
            Ok(GpuParameterValue::SizePair(a, b)) => {
                readings.push_str(&format!("{a}x{b}"));
            }
            Ok(GpuParameterValue::Range(lo, hi)) => {
                readings.push_str(&format!("{lo}..{hi}"));
            }
            Err(failure) => return denied(Vector::Webgl, failure),
        }
        readings.push(';');
    }
    FingerprintSignal::measured(
        Vector::Webgl,
        SignalValue::Text(salted_digest(readings.as_bytes(), salt)),
    )
}

pub fn collect_plugins(host: &HostEnvironment, salt: &str) -> FingerprintSignal {
    let Some(navigator) = host.navigator.as_deref() else {
        return FingerprintSignal::unsupported(Vector::Plugins);
    };
    match navigator.plugins() {
        Ok(plugins) => FingerprintSignal::measured(
            Vector::Plugins,
            SignalValue::List(
                plugins
                    .iter()
                    .map(|p| salted_entry_digest(p, salt))
                    .collect(),
            ),
        ),
        Err(failure) => denied(Vector::Plugins, failure),
    }
}

pub fn collect_fonts(host: &HostEnvironment, salt: &str) -> FingerprintSignal {
    let Some(fonts) = host.fonts.as_deref() else {
        return FingerprintSignal::unsupported(Vector::Fonts);
    };
    // width vector of the probe string across the standard candidates
    let mut widths = String::new();
    for family in crate::profile::STANDARD_FONTS {
        match fonts.measure_text(FONT_PROBE_TEXT, family) {
            Ok(width) => widths.push_str(&format!("{family}:{width:.3};")),
            Err(failure) => return denied(Vector::Fonts, failure),
        }
    }
    FingerprintSignal::measured(
        Vector::Fonts,
        SignalValue::Text(salted_digest(widths.as_bytes(), salt)),
    )
}

pub fn collect_screen(host: &HostEnvironment, salt: &str) -> FingerprintSignal {
    let Some(screen) = host.screen.as_deref() else {
        return FingerprintSignal::unsupported(Vector::Screen);
    };
    match screen.metrics() {
        Ok(m) => {
            let raw = format!(
                "{}x{} {}x{}",
                m.width, m.height, m.avail_width, m.avail_height
            );
            FingerprintSignal::measured(
                Vector::Screen,
                SignalValue::Text(salted_digest(raw.as_bytes(), salt)),
            )
        }
        Err(failure) => denied(Vector::Screen, failure),
    }
}

pub fn collect_timezone(host: &HostEnvironment, salt: &str) -> FingerprintSignal {
    let Some(time) = host.time.as_deref() else {
        return FingerprintSignal::unsupported(Vector::Timezone);
    };
    match time.utc_offset_minutes() {
        Ok(offset) => FingerprintSignal::measured(
            Vector::Timezone,
            SignalValue::Text(salted_digest(offset.to_string().as_bytes(), salt)),
        ),
        Err(failure) => denied(Vector::Timezone, failure),
    }
}

pub fn collect_language(host: &HostEnvironment, salt: &str) -> FingerprintSignal {
    let Some(navigator) = host.navigator.as_deref() else {
        return FingerprintSignal::unsupported(Vector::Language);
    };
    match navigator.languages() {
        Ok(languages) => FingerprintSignal::measured(
            Vector::Language,
            SignalValue::Text(salted_digest(languages.join(",").as_bytes(), salt)),
        ),
        Err(failure) => denied(Vector::Language, failure),
    }
}

pub fn collect_user_agent(host: &HostEnvironment, salt: &str) -> FingerprintSignal {
    let Some(navigator) = host.navigator.as_deref() else {
        return FingerprintSignal::unsupported(Vector::UserAgent);
    };
    match navigator.user_agent() {
        Ok(ua) => FingerprintSignal::measured(
            Vector::UserAgent,
            SignalValue::Text(salted_digest(ua.as_bytes(), salt)),
        ),
        Err(failure) => denied(Vector::UserAgent, failure),
    }
}

/// Run every collector in table order.
///
/// Returns an empty list outright (no partial pass) when the host lacks the
/// basic platform primitives, e.g. a headless or server-side context.
pub fn collect_all(host: &HostEnvironment, salt: &str) -> Vec<FingerprintSignal> {
    if !host.has_basic_support() {
        log::warn!("host lacks basic platform primitives; skipping collection");
        return Vec::new();
    }
    vec![
        collect_canvas(host, salt),
        collect_webgl(host, salt),
        collect_plugins(host, salt),
        collect_fonts(host, salt),
        collect_screen(host, salt),
        collect_timezone(host, salt),
        collect_language(host, salt),
        collect_user_agent(host, salt),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{ApiFailure, ApiResult, NavigatorSource, RenderingSurface};

    struct FakeNavigator;

    impl NavigatorSource for FakeNavigator {
        fn user_agent(&self) -> ApiResult<String> {
            Ok("TestBrowser/9.0".into())
        }
        fn languages(&self) -> ApiResult<Vec<String>> {
            Ok(vec!["en-US".into(), "en".into()])
        }
        fn plugins(&self) -> ApiResult<Vec<String>> {
            Ok(vec!["PDF Viewer".into(), "Widevine".into()])
        }
    }

    struct DeniedSurface;

    impl RenderingSurface for DeniedSurface {
        fn read_pixels(&self) -> ApiResult<Vec<u8>> {
            Err(ApiFailure::PermissionDenied)
        }
        fn export_data_url(&self) -> ApiResult<String> {
            Err(ApiFailure::PermissionDenied)
        }
    }

    struct GoodSurface;

    impl RenderingSurface for GoodSurface {
        fn read_pixels(&self) -> ApiResult<Vec<u8>> {
            Ok(vec![10, 20, 30, 255])
        }
        fn export_data_url(&self) -> ApiResult<String> {
            Ok("data:image/png;base64,".into())
        }
    }

    fn nav_host() -> HostEnvironment {
        HostEnvironment {
            navigator: Some(Box::new(FakeNavigator)),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_host_collects_nothing() {
        assert!(collect_all(&HostEnvironment::default(), "salt").is_empty());
    }

    #[test]
    fn test_table_order_and_sentinels() {
        let signals = collect_all(&nav_host(), "salt");
        let ids: Vec<&str> = signals.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "canvas", "webgl", "plugins", "fonts", "screen", "timezone", "language",
                "userAgent"
            ]
        );
        // vectors without a capability degrade to the unsupported sentinel
        assert_eq!(signals[0].value, SignalValue::text("unsupported"));
        assert_eq!(signals[0].risk_score, 0.0);
        // navigator-backed vectors are measured
        assert!(matches!(signals[7].value, SignalValue::Text(ref v) if v.len() == 64));
    }

    #[test]
    fn test_denied_read_degrades() {
        let host = HostEnvironment {
            rendering: Some(Box::new(DeniedSurface)),
            ..Default::default()
        };
        let signal = collect_canvas(&host, "salt");
        assert_eq!(signal.value, SignalValue::text("denied"));
        assert_eq!(signal.risk_score, Vector::Canvas.default_risk());
    }

    #[test]
    fn test_salt_changes_value() {
        let host = HostEnvironment {
            rendering: Some(Box::new(GoodSurface)),
            ..Default::default()
        };
        let a = collect_canvas(&host, "salt-a");
        let b = collect_canvas(&host, "salt-b");
        assert_ne!(a.value, b.value, "same raw reading must differ across salts");
        let a2 = collect_canvas(&host, "salt-a");
        assert_eq!(a.value, a2.value, "same salt must reproduce the value");
    }

    #[test]
    fn test_plugin_list_entries_are_short_digests() {
        let signal = collect_plugins(&nav_host(), "salt");
        match signal.value {
            SignalValue::List(entries) => {
                assert_eq!(entries.len(), 2);
                for e in entries {
                    assert_eq!(e.len(), 16);
                    assert!(!e.contains("PDF"), "raw plugin names must not leak");
                }
            }
            other => panic!("expected list value, got {other:?}"),
        }
    }

    #[test]
    fn test_digest_bounded_length() {
        let ua = collect_user_agent(&nav_host(), "salt");
        match ua.value {
            SignalValue::Text(v) => assert!(v.len() <= 64),
            other => panic!("expected text value, got {other:?}"),
        }
    }
}
