/// Render requests for the external barcode library and its fallback policy
use crate::error::{self, Error, RenderFailure};
use crate::preferences::DisplaySettings;
use crate::symbology::Symbology;
use crate::validate::{normalize, trim_input};
use serde::Serialize;

pub const BARCODE_HEIGHT: u32 = 10;

/// Alternate id tried once when the plain MSI id is rejected
const MSI_MOD10_BCID: &str = "msi10";

/// Options object handed to the renderer, in its own field naming
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderOptions {
    pub bcid: String,
    pub text: String,
    pub scale: f64,
    pub includetext: bool,
    pub height: u32,
    pub backgroundcolor: String,
    pub barcolor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub includecheck: Option<bool>,
}

impl RenderOptions {
    pub fn new(symbology: &Symbology, text: &str, settings: &DisplaySettings) -> Self {
        let includecheck = match symbology {
            Symbology::Code39 | Symbology::Interleaved2of5 => Some(false),
            _ => None,
        };

        RenderOptions {
            bcid: symbology.bcid().to_string(),
            text: text.to_string(),
            scale: settings.scale,
            includetext: settings.show_text,
            height: BARCODE_HEIGHT,
            backgroundcolor: strip_hash(&settings.bg_color),
            barcolor: strip_hash(&settings.fg_color),
            includecheck,
        }
    }
}

fn strip_hash(color: &str) -> String {
    color.trim_start_matches('#').to_string()
}

/// Draws a barcode onto the popup's canvas
pub trait Renderer {
    fn render(&mut self, options: &RenderOptions) -> Result<(), RenderFailure>;
}

/// Render, retrying MSI once under its mod-10 id if the library does not
/// know the plain id. The first failure is reported if the retry fails too.
///
/// Returns the options that were actually rendered.
pub fn render_with_fallback<R: Renderer + ?Sized>(
    renderer: &mut R,
    symbology: &Symbology,
    options: RenderOptions,
) -> Result<RenderOptions, RenderFailure> {
    let err = match renderer.render(&options) {
        Ok(()) => return Ok(options),
        Err(err) => err,
    };

    if *symbology != Symbology::Msi || !err.message.contains("Unknown") {
        return Err(err);
    }

    let retry = RenderOptions {
        bcid: MSI_MOD10_BCID.to_string(),
        ..options
    };
    log::debug!("Retrying MSI as {} after: {}", MSI_MOD10_BCID, err);

    match renderer.render(&retry) {
        Ok(()) => Ok(retry),
        Err(retry_err) => {
            log::warn!("MSI fallback failed: {}", retry_err);
            Err(err)
        }
    }
}

/// Validate the user's text and draw it. Returns the options used, whose
/// `text` is the canonical payload to record in history.
pub fn generate<R: Renderer + ?Sized>(
    renderer: &mut R,
    symbology: &Symbology,
    raw: &str,
    settings: &DisplaySettings,
) -> error::Result<RenderOptions> {
    if trim_input(raw).is_empty() {
        return Err(Error::EmptyInput);
    }

    let text = normalize(raw, symbology)?;
    let options = RenderOptions::new(symbology, &text, settings);
    Ok(render_with_fallback(renderer, symbology, options)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Rejects every id in `unknown` and records each attempt
    struct FakeRenderer {
        unknown: Vec<&'static str>,
        attempts: Vec<String>,
    }

    impl FakeRenderer {
        fn rejecting(unknown: &[&'static str]) -> Self {
            FakeRenderer {
                unknown: unknown.to_vec(),
                attempts: Vec::new(),
            }
        }
    }

    impl Renderer for FakeRenderer {
        fn render(&mut self, options: &RenderOptions) -> Result<(), RenderFailure> {
            self.attempts.push(options.bcid.clone());
            if self.unknown.contains(&options.bcid.as_str()) {
                Err(RenderFailure::new(format!(
                    "bwipp.unknownEncoder: Unknown encoder {}",
                    options.bcid
                )))
            } else {
                Ok(())
            }
        }
    }

    fn options_for(symbology: &Symbology) -> RenderOptions {
        RenderOptions::new(symbology, "123456", &DisplaySettings::default())
    }

    #[test]
    fn test_options_from_settings() {
        let settings = DisplaySettings {
            scale: 2.0,
            show_text: false,
            fg_color: "#123456".to_string(),
            bg_color: "#abcdef".to_string(),
        };

        let options = RenderOptions::new(&Symbology::Ean13, "123456789012", &settings);

        assert_eq!(options.bcid, "ean13");
        assert_eq!(options.scale, 2.0);
        assert!(!options.includetext);
        assert_eq!(options.height, 10);
        assert_eq!(options.barcolor, "123456");
        assert_eq!(options.backgroundcolor, "abcdef");
        assert_eq!(options.includecheck, None);
    }

    #[test]
    fn test_includecheck_only_for_code39_and_itf() {
        assert_eq!(options_for(&Symbology::Code39).includecheck, Some(false));
        assert_eq!(options_for(&Symbology::Interleaved2of5).includecheck, Some(false));
        assert_eq!(options_for(&Symbology::Msi).includecheck, None);

        let json = serde_json::to_value(options_for(&Symbology::QrCode)).unwrap();
        assert!(json.get("includecheck").is_none());
    }

    #[test]
    fn test_success_renders_once() {
        let mut renderer = FakeRenderer::rejecting(&[]);
        let used =
            render_with_fallback(&mut renderer, &Symbology::Msi, options_for(&Symbology::Msi))
                .unwrap();

        assert_eq!(used.bcid, "msi");
        assert_eq!(renderer.attempts, vec!["msi"]);
    }

    #[test]
    fn test_msi_retries_with_mod10_id() {
        let mut renderer = FakeRenderer::rejecting(&["msi"]);
        let used =
            render_with_fallback(&mut renderer, &Symbology::Msi, options_for(&Symbology::Msi))
                .unwrap();

        assert_eq!(used.bcid, "msi10");
        assert_eq!(renderer.attempts, vec!["msi", "msi10"]);
    }

    #[test]
    fn test_msi_fallback_failure_reports_first_error() {
        let mut renderer = FakeRenderer::rejecting(&["msi", "msi10"]);
        let err =
            render_with_fallback(&mut renderer, &Symbology::Msi, options_for(&Symbology::Msi))
                .unwrap_err();

        assert!(err.message.ends_with("Unknown encoder msi"));
        assert_eq!(renderer.attempts.len(), 2);
    }

    #[test]
    fn test_no_fallback_for_other_symbologies() {
        let mut renderer = FakeRenderer::rejecting(&["code11"]);
        let result = render_with_fallback(
            &mut renderer,
            &Symbology::Code11,
            options_for(&Symbology::Code11),
        );

        assert!(result.is_err());
        assert_eq!(renderer.attempts, vec!["code11"]);
    }

    #[test]
    fn test_generate_normalizes_before_rendering() {
        let mut renderer = FakeRenderer::rejecting(&[]);
        let options = generate(
            &mut renderer,
            &Symbology::Code39,
            "  hello  ",
            &DisplaySettings::default(),
        )
        .unwrap();

        assert_eq!(options.text, "HELLO");
        assert_eq!(renderer.attempts, vec!["code39"]);
    }

    #[test]
    fn test_generate_rejects_empty_input() {
        let mut renderer = FakeRenderer::rejecting(&[]);
        let err = generate(&mut renderer, &Symbology::QrCode, "   ", &DisplaySettings::default())
            .unwrap_err();

        assert!(matches!(err, Error::EmptyInput));
        assert!(renderer.attempts.is_empty());
    }

    #[test]
    fn test_generate_stops_on_validation_failure() {
        let mut renderer = FakeRenderer::rejecting(&[]);
        let err = generate(
            &mut renderer,
            &Symbology::Interleaved2of5,
            "123",
            &DisplaySettings::default(),
        )
        .unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        assert!(renderer.attempts.is_empty());
    }

    #[test]
    fn test_generate_surfaces_render_failure() {
        let mut renderer = FakeRenderer::rejecting(&["code11"]);
        let err = generate(&mut renderer, &Symbology::Code11, "12-34", &DisplaySettings::default())
            .unwrap_err();

        assert!(matches!(err, Error::Render(_)));
    }

    #[test]
    fn test_no_fallback_for_msi_data_errors() {
        struct BadData;
        impl Renderer for BadData {
            fn render(&mut self, _: &RenderOptions) -> Result<(), RenderFailure> {
                Err(RenderFailure::new("Invalid character"))
            }
        }

        let err = render_with_fallback(&mut BadData, &Symbology::Msi, options_for(&Symbology::Msi))
            .unwrap_err();
        assert_eq!(err.message, "Invalid character");
    }
}
