// ABOUTME: Command implementations for the docmerge CLI
// ABOUTME: Handles execution of the render, inspect and variants commands

use anyhow::{anyhow, Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::args::RenderArgs;
use super::config::Config;
use crate::fields::{key_variants, DataRecord};
use crate::output::OutputHandler;
use crate::package::TemplateArchive;
use crate::source::TemplateLoader;
use crate::template::{render_blocking, RenderFailure, RenderOptions, TemplateEngine};

/// Render a template and write the generated document
pub async fn render_template(args: RenderArgs, config: &Config) -> Result<()> {
    let loader = TemplateLoader::new(config.source.clone())?;
    let location = loader.locate(&args.template)?;
    info!("Rendering template: {}", location);

    let record = build_record(&args).await?;
    info!("Loaded {} fields", record.len());

    let template = loader
        .load(&location)
        .await
        .with_context(|| format!("Failed to load template {}", location))?;

    let options = RenderOptions {
        linebreaks: config.render.linebreaks && !args.no_linebreaks,
        paragraph_loop: config.render.paragraph_loop && !args.no_paragraph_loop,
    };
    debug!("Render options: {:?}", options);

    let cancel = CancellationToken::new();
    let render = render_blocking(
        TemplateEngine::with_options(options),
        template,
        record,
        cancel.clone(),
    );
    tokio::pin!(render);

    let result = tokio::select! {
        result = &mut render => result,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupt received, cancelling render");
            cancel.cancel();
            render.await
        }
    };

    let output = OutputHandler::new();
    let mut output_config = config.output.clone();
    if let Some(format) = args.report_format {
        output_config.report_format = format;
    }

    match result {
        Ok(document) => {
            let stem = location.stem();
            let document = match stem.as_deref() {
                Some(stem) => document.with_template_stem(stem),
                None => document,
            };
            let path = output
                .write_document(
                    &document,
                    &output_config,
                    args.output.as_deref(),
                    stem.as_deref(),
                )
                .await?;

            println!(
                "✓ Generated {} ({} bytes, {})",
                path.display(),
                document.size(),
                document.content_type()
            );
            Ok(())
        }
        Err(RenderFailure::Template(report)) => {
            output.output_report(&report, &output_config).await?;
            Err(anyhow!(
                "Template contains {} placeholder error(s)",
                report.len()
            ))
        }
        Err(failure) => Err(failure.into()),
    }
}

/// Merge field data from the data file, the query string and `--var`
/// assignments, later sources overriding earlier ones.
async fn build_record(args: &RenderArgs) -> Result<DataRecord> {
    let mut record = DataRecord::new();

    if let Some(path) = &args.data {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read data file {}", path.display()))?;
        record.extend(DataRecord::from_json(&content)?);
    }
    if let Some(query) = &args.query {
        record.extend(DataRecord::from_query(query));
    }
    record.extend(DataRecord::from_assignments(&args.vars)?);

    Ok(record)
}

/// Inspect a template without rendering it
pub async fn inspect_template(
    template: String,
    no_paragraph_loop: bool,
    format: Option<String>,
    config: &Config,
) -> Result<()> {
    let loader = TemplateLoader::new(config.source.clone())?;
    let location = loader.locate(&template)?;
    info!("Inspecting template: {}", location);

    let bytes = loader
        .load(&location)
        .await
        .with_context(|| format!("Failed to load template {}", location))?;
    let archive = TemplateArchive::from_bytes(bytes)?;

    let options = RenderOptions {
        paragraph_loop: config.render.paragraph_loop && !no_paragraph_loop,
        ..config.render
    };
    let inspection = TemplateEngine::with_options(options).inspect(&archive)?;

    let mut output_config = config.output.clone();
    if let Some(format) = format {
        output_config.report_format = format;
    }
    OutputHandler::new()
        .output_inspection(&inspection, &output_config)
        .await?;

    if inspection.is_valid() {
        Ok(())
    } else {
        Err(anyhow!(
            "Template contains {} placeholder error(s)",
            inspection.errors.len()
        ))
    }
}

/// Print the key variants of each key
pub fn print_variants(keys: &[String]) -> Result<()> {
    for key in keys {
        println!("{}:", key);
        for variant in key_variants(key) {
            println!("  {}", variant);
        }
    }
    Ok(())
}
