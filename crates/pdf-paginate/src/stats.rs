use crate::options::ExportOptions;
use crate::paginate::plan_slices;
use crate::types::*;

/// Calculate statistics for exporting a `width x height` raster
pub fn calculate_statistics(
    width: u32,
    height: u32,
    options: &ExportOptions,
) -> Result<ExportStatistics> {
    options.validate()?;
    let plan = plan_slices(width, height, &options.geometry())?;
    Ok(plan.statistics())
}
