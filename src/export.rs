/// Export helpers: file names, SVG wrapper and print page for a rendered barcode
use crate::symbology::Symbology;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Svg,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Svg => "svg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Svg => "image/svg+xml",
        }
    }
}

/// e.g. `barcode_ean13_1700000000000.png`
pub fn download_filename(symbology: &Symbology, format: ExportFormat, millis: i64) -> String {
    format!("barcode_{}_{}.{}", symbology.bcid(), millis, format.extension())
}

/// An SVG document that embeds the rendered PNG at its native size
pub fn svg_wrapper(width: u32, height: u32, png_data_url: &str) -> String {
    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}">"#,
            r#"<image x="0" y="0" width="{w}" height="{h}" xlink:href="{src}"/>"#,
            "</svg>"
        ),
        w = width,
        h = height,
        src = png_data_url
    )
}

/// Standalone page shown in the print window
pub fn print_document(png_data_url: &str) -> String {
    format!(
        r#"<html>
<head>
<title>Print Barcode</title>
<style>
body {{ margin: 0; padding: 20px; display: flex; justify-content: center; align-items: center; min-height: 100vh; background: white; }}
img {{ max-width: 100%; height: auto; }}
@media print {{ body {{ padding: 0; }} }}
</style>
</head>
<body>
<img src="{}" alt="Barcode">
</body>
</html>"#,
        png_data_url
    )
}
