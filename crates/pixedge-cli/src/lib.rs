use pixedge_core::{OutputFormat, ProcessingConfig};

/// Processing options as given on the command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessOptions {
    pub format: Option<OutputFormat>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub quality: Option<u8>,
    pub angle: Option<f64>,
    pub watermark: Option<String>,
}

impl ProcessOptions {
    /// Validated processing configuration for these options.
    pub fn to_config(&self) -> anyhow::Result<ProcessingConfig> {
        let config = ProcessingConfig {
            format: self.format,
            width: self.width,
            height: self.height,
            quality: self.quality,
            angle: self.angle,
            watermark_text: self.watermark.clone(),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
