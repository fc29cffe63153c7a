#![warn(clippy::pedantic)]

use std::sync::Arc;

pub mod preferences;
pub mod templates;

use badgewright_core::{
    controller::CanvasController,
    images::FileImageLoader,
    panels::properties,
    state::Template,
    store::DesignStore,
    surface::{memory::MemorySurfaceFactory, RenderSurface},
};

use anyhow::Result as AnyResult;

/// Write the current (or default) preferences file, with documentation, and carry on.
const SAVE_PREFERENCES_FLAG: &str = "--save-preferences";

fn main() -> AnyResult<()> {
    let has_term = std::io::IsTerminal::is_terminal(&std::io::stdin());
    // Log to a terminal, if available. Else, log to "log.out" in the working directory.
    if has_term {
        env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        let _ = simple_logging::log_to_file("log.out", log::LevelFilter::Debug);
    }

    let preferences = preferences::Preferences::load();

    // Args are a simple list of template paths.
    // Paths are OSStrings, let the system handle character encoding restrictions.
    let mut save_preferences = false;
    let paths: Vec<std::path::PathBuf> = std::env::args_os()
        .skip(1)
        .filter(|arg| {
            let is_flag = *arg == *SAVE_PREFERENCES_FLAG;
            save_preferences |= is_flag;
            !is_flag
        })
        .map(Into::into)
        .collect();
    if save_preferences {
        if let Err(e) = preferences.save() {
            log::warn!("Failed to save preferences:\n{e:?}");
        }
    }

    let templates: Vec<Template> = if paths.is_empty() {
        log::info!("No templates given, using a blank CR80 card");
        vec![Template::cr80()]
    } else {
        use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
        // Order is kept, so the designs are shown in the order given.
        let loaded: Vec<_> = paths
            .par_iter()
            .map(|path| templates::load(path))
            .collect();
        loaded
            .into_iter()
            .filter_map(|template| {
                template
                    .inspect_err(|e| log::error!("{e:#}"))
                    .ok()
            })
            .collect()
    };
    if templates.is_empty() {
        anyhow::bail!("Failed to load any provided template.");
    }

    // Image loads are the only asynchronous work.
    let runtime = tokio::runtime::Builder::new_current_thread().build()?;
    let loader = Arc::new(FileImageLoader::new(preferences.image_root.clone()));

    let mut store = DesignStore::new(preferences.view());
    let mut controller = CanvasController::new(MemorySurfaceFactory::new())
        .with_images(loader, runtime.handle().clone());

    for template in &templates {
        store.initialize_design(template);
        controller.tick(&mut store);
        // Let the images arrive, then pick them up.
        runtime.block_on(controller.settle_images());
        let report = controller.tick(&mut store);
        log::info!(
            "{:?}: {:?}, {} primitives",
            template.name,
            report.state,
            controller
                .surface()
                .map_or(0, |surface| surface.primitives().len())
        );

        if let Some(surface) = controller.surface() {
            for primitive in surface.primitives() {
                let geometry = &primitive.geometry;
                log::info!(
                    "  {} {:<8} at ({:.1}, {:.1}) {:.1}x{:.1}{}",
                    primitive.tag,
                    primitive.shape.name(),
                    geometry.left.get(),
                    geometry.top.get(),
                    geometry.scaled_width().get(),
                    geometry.scaled_height().get(),
                    if primitive.visible { "" } else { " (hidden)" },
                );
            }
        }
        if let Some(view) = store.inspect() {
            for (label, value) in properties::fields(view) {
                log::debug!("  {label}: {value}");
            }
        }
    }
    store.close_design();
    controller.tick(&mut store);

    Ok(())
}
