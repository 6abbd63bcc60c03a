use image::RgbImage;
use indicatif::ProgressBar;

use crate::{
    catalog::Catalog,
    clap::MosaicConfig,
    codec, compositor,
    error::Result,
    matcher::{self, AssignmentMap},
};

/// Runs the whole pipeline and writes the output image. Nothing is written
/// unless every stage succeeds.
pub(crate) fn mosaic(config: &MosaicConfig) -> Result<()> {
    println!("[1/4] Preparing the sample images.");
    let pb = progress_bar(config.progress);
    let catalog = Catalog::load(&config.samples, &pb)?;
    pb.finish_and_clear();
    let (tile_width, tile_height) = catalog.tile_size();
    log::info!(
        "prepared {} sample images of {}x{} from {}",
        catalog.len(),
        tile_width,
        tile_height,
        config.samples.display()
    );
    println!("[1/4] Finished preparing {} sample images.", catalog.len());

    println!("[2/4] Loading the target image.");
    let target = codec::decode(&config.target)?;
    log::info!(
        "target {} is {}x{}",
        config.target.display(),
        target.width(),
        target.height()
    );
    println!("[2/4] Finished loading the target image.");

    println!("[3/4] Matching pixels to sample images.");
    let pb = progress_bar(config.progress);
    let map = matcher::assign(&target, &catalog.colors(), &pb)?;
    pb.finish_and_clear();
    drop(target);
    println!("[3/4] Finished matching pixels to sample images.");

    println!("[4/4] Rendering the mosaic image.");
    let pb = progress_bar(config.progress);
    let output = render(&catalog, &map, &pb)?;
    pb.finish_and_clear();
    log::info!(
        "writing {}x{} mosaic to {}",
        output.width(),
        output.height(),
        config.output.display()
    );
    codec::encode(&config.output, &output, config.quality)?;
    println!("[4/4] Finished rendering the mosaic image.");
    println!("All done.");
    Ok(())
}

fn render(catalog: &Catalog, map: &AssignmentMap, pb: &ProgressBar) -> Result<RgbImage> {
    compositor::composite(map, &catalog.images(), catalog.tile_size(), pb)
}

fn progress_bar(visible: bool) -> ProgressBar {
    if visible {
        ProgressBar::new(0)
    } else {
        ProgressBar::hidden()
    }
}
