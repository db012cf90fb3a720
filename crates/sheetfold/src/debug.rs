//! The folded box as a [`Sheet`], for orthographic debug views.

use log::debug;
use sheetfold_drafting::ProjectedView;
use sheetfold_sheet::{three_view, Bend, Plane, Sheet, Side};

use crate::error::Result;
use crate::params::BoxParams;
use crate::unfold::wall_bend;

/// Lid of thickness `params.thickness` with every side pulled in by its
/// inside setback and bent by the angle it makes with its wall.
pub fn folded_sheet(params: &BoxParams) -> Result<Sheet> {
    params.validate()?;
    let normal = params.top_face_normal()?;
    let mut lid = Plane::fitting(params.size - params.thickness * 2.0, &normal)?;
    let mut bends = Vec::with_capacity(4);
    for side in Side::ALL {
        let bend = wall_bend(params, &normal, side)?;
        lid = lid.resized(side, -bend.spec.inside_setback())?;
        bends.push(bend);
    }

    let mut sheet = lid.extrude(params.thickness)?;
    for bend in bends {
        let face = sheet.face(bend.side)?;
        let flange = Bend::new(face, bend.angle(), params.bend_radius, params.k_factor)?;
        sheet = sheet.with_bend(bend.side, flange);
    }
    Ok(sheet)
}

/// Top, front and right views of [`folded_sheet`].
pub fn debug_views(params: &BoxParams) -> Result<Vec<ProjectedView>> {
    let sheet = folded_sheet(params)?;
    let views = three_view(&sheet)?;
    debug!("rendered {} debug views", views.len());
    Ok(views)
}
