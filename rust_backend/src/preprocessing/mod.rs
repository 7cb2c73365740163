pub mod enricher;
pub mod pipeline;

pub use enricher::WeatherEnricher;
pub use pipeline::{EtlPipeline, PipelineReport, PipelineTables};
