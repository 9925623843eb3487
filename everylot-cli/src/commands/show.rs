//! Show command - print a lot without contacting any service.

use std::path::PathBuf;

use everylot::camera::aim_camera;
use everylot::geometry::Parcel;
use everylot::lot::{format_coordinate, Lot, LotSelector};
use everylot::provider::IMAGE_SIZE;
use everylot::store::LotStore;
use tracing::warn;

use super::common::resolve_database;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the show command.
pub struct ShowArgs {
    pub database: Option<PathBuf>,
    pub id: Option<i64>,
}

/// Run the show command.
pub fn run(runner: &CliRunner, args: ShowArgs) -> Result<(), CliError> {
    runner.log_startup("show");
    let database = resolve_database(args.database, runner.config())?;

    let store = LotStore::open(&database)?;
    let lot = store.select(LotSelector::from_id(args.id))?;
    print!("{}", describe(&lot));
    Ok(())
}

/// Human-readable summary of a lot.
pub fn describe(lot: &Lot) -> String {
    let mut out = format!("Lot {}\n", lot.id);
    let field = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());

    out.push_str(&format!("  Address:  {}\n", field(&lot.address)));
    out.push_str(&format!(
        "  City:     {} {} {}\n",
        field(&lot.city),
        field(&lot.state),
        field(&lot.zip)
    ));
    match lot.coordinates() {
        Some((lat, lon)) => out.push_str(&format!(
            "  Location: {},{}\n",
            format_coordinate(lat),
            format_coordinate(lon)
        )),
        None => out.push_str("  Location: -\n"),
    }

    let aim = aim_camera(lot.floors);
    out.push_str(&format!("  Camera:   fov={} pitch={}\n", aim.fov, aim.pitch));

    if let Some(bytes) = lot.geometry.as_deref() {
        match Parcel::from_wkb(bytes).and_then(|p| p.viewport((IMAGE_SIZE, IMAGE_SIZE))) {
            Ok(viewport) => out.push_str(&format!(
                "  Map:      {} ring(s), zoom {}\n",
                viewport.paths.len(),
                viewport.zoom
            )),
            Err(e) => {
                warn!(lot_id = lot.id, error = %e, "Unusable geometry");
                out.push_str(&format!("  Map:      unavailable ({})\n", e));
            }
        }
    }

    match lot.tweeted {
        Some(post_id) if lot.is_posted() => out.push_str(&format!("  Posted:   {}\n", post_id)),
        _ => out.push_str("  Posted:   no\n"),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_unposted_lot() {
        let mut lot = Lot::new(3);
        lot.address = Some("1 Main St".to_string());
        lot.city = Some("Springfield".to_string());
        lot.lat = Some(40.0);
        lot.lon = Some(-75.25);
        lot.floors = Some(5.0);

        let text = describe(&lot);
        assert!(text.starts_with("Lot 3\n"));
        assert!(text.contains("Address:  1 Main St"));
        assert!(text.contains("Location: 40.0,-75.25"));
        assert!(text.contains("fov=81 pitch=20"));
        assert!(text.contains("Posted:   no"));
        assert!(!text.contains("Map:"));
    }

    #[test]
    fn test_describe_bad_geometry() {
        let mut lot = Lot::new(4);
        lot.geometry = Some(vec![9, 9, 9]);
        lot.tweeted = Some(55);

        let text = describe(&lot);
        assert!(text.contains("Location: -"));
        assert!(text.contains("Map:      unavailable"));
        assert!(text.contains("Posted:   55"));
    }
}
