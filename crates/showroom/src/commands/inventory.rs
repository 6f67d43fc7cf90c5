//! Inventory command handlers.
//!
//! Filters are applied as a sequence of intents against the query view
//! built by the initial load. Each edit supersedes the previous search;
//! what is rendered is the last search's result.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use tabled::Tabled;

use showroom_core::{
    Command as CoreCommand, CommandResult, Facet, Intent, QueryView, RangeField, Vehicle,
    VehicleDraft,
};

use crate::cli::{FilterArgs, GlobalOpts, InventoryArgs, InventoryCommand};
use crate::error::CliError;
use crate::output::{self, thousands};
use crate::session::Session;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct VehicleRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Make")]
    make: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Year")]
    year: i64,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Odometer")]
    odometer: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Body")]
    body_type: String,
}

impl From<&Vehicle> for VehicleRow {
    fn from(v: &Vehicle) -> Self {
        Self {
            id: v.id.clone(),
            make: v.make.clone(),
            model: v.model.clone(),
            year: v.year,
            price: thousands(v.price),
            odometer: format!("{} km", thousands(v.odometer)),
            status: v.status.as_str().to_owned(),
            body_type: v.body_type.clone(),
        }
    }
}

fn detail(v: &Vehicle) -> String {
    let mut lines = vec![
        format!("ID:            {}", v.id),
        format!("Vehicle:       {} {} ({})", v.make, v.model, v.year),
        format!("Price:         {}", thousands(v.price)),
        format!("Odometer:      {} km", thousands(v.odometer)),
        format!("Status:        {}", v.status.as_str()),
        format!("Condition:     {}", v.condition),
        format!("Body:          {}", v.body_type),
        format!("Assembly:      {}", v.assembly),
        format!("Fuel:          {}", v.fuel_type),
        format!("Transmission:  {}", v.transmission),
    ];
    if let Some(price) = v.sold_price {
        lines.push(format!("Sold for:      {}", thousands(price)));
    }
    if let Some(date) = v.sold_date {
        lines.push(format!("Sold on:       {}", date.format("%Y-%m-%d")));
    }
    if let Some(ref buyer) = v.buyer_id {
        lines.push(format!("Buyer:         {buyer}"));
    }
    if !v.specification.is_empty() {
        lines.push(format!("Spec:          {}", v.specification.join(", ")));
    }
    if !v.images.is_empty() {
        lines.push("Images:".into());
        for image in &v.images {
            lines.push(format!("  {}", image.url));
        }
    }
    lines.join("\n")
}

fn facets_detail(view: &QueryView) -> String {
    let mut out = String::new();
    for facet in [
        Facet::Make,
        Facet::Model,
        Facet::Status,
        Facet::Condition,
        Facet::BodyType,
        Facet::Assembly,
        Facet::FuelType,
        Facet::Transmission,
    ] {
        let selected = view.selected(facet);
        let universe = view.universe(facet);
        let values = if selected.is_empty() {
            "(none)".to_owned()
        } else {
            selected.iter().cloned().collect::<Vec<_>>().join(", ")
        };
        let _ = writeln!(
            out,
            "{:<14}{}/{}  {values}",
            format!("{facet}:"),
            selected.len(),
            universe.len()
        );
    }
    for field in [RangeField::Price, RangeField::Year, RangeField::Odometer] {
        let range = view.range(field);
        let _ = writeln!(
            out,
            "{:<14}{}..{}  of {}..{}",
            format!("{field}:"),
            thousands(range.low()),
            thousands(range.high()),
            thousands(range.min()),
            thousands(range.max())
        );
    }
    let search = view.search();
    let _ = write!(
        out,
        "{:<14}{}",
        "search:",
        if search.is_empty() { "-" } else { search }
    );
    out
}

// ── Filter application ──────────────────────────────────────────────

/// Narrow each facet named in `filters` to exactly the values given,
/// then apply ranges and search text.
fn apply_filters(session: &Session, filters: &FilterArgs) -> Result<(), CliError> {
    let facets = [
        (Facet::Make, &filters.make),
        (Facet::Model, &filters.model),
        (Facet::Status, &filters.status),
        (Facet::Condition, &filters.condition),
        (Facet::BodyType, &filters.body_type),
        (Facet::Assembly, &filters.assembly),
        (Facet::FuelType, &filters.fuel_type),
        (Facet::Transmission, &filters.transmission),
    ];

    for (facet, values) in facets {
        if values.is_empty() {
            continue;
        }
        narrow_facet(session, facet, values)?;
    }

    let ranges = [
        (RangeField::Price, filters.price),
        (RangeField::Year, filters.year),
        (RangeField::Odometer, filters.odometer),
    ];
    for (field, range) in ranges {
        let Some((low, high)) = range else { continue };
        if low > high {
            return Err(CliError::Validation {
                field: field.to_string(),
                reason: format!("{low} is greater than {high}"),
            });
        }
        session
            .controller
            .dispatch(Intent::SetRange { field, low, high })?;
    }

    if let Some(ref text) = filters.search {
        session
            .controller
            .dispatch(Intent::SetInventorySearch(text.clone()))?;
    }
    Ok(())
}

fn narrow_facet(session: &Session, facet: Facet, values: &[String]) -> Result<(), CliError> {
    let wanted: BTreeSet<&str> = values.iter().map(String::as_str).collect();
    let view = current_view(session)?;
    let universe = view.universe(facet);

    if let Some(unknown) = wanted.iter().find(|v| !universe.contains(**v)) {
        let expected = universe.iter().cloned().collect::<Vec<_>>().join(", ");
        return Err(CliError::Validation {
            field: facet.to_string(),
            reason: format!("'{unknown}' is not available; expected one of: {expected}"),
        });
    }

    if !view.selected(facet).is_empty() {
        if *view.selected(facet) != universe {
            // Select all first so the next toggle empties the facet.
            session.controller.dispatch(Intent::ToggleAllFacet(facet))?;
        }
        session.controller.dispatch(Intent::ToggleAllFacet(facet))?;
    }
    for value in wanted {
        session.controller.dispatch(Intent::ToggleFacetValue {
            facet,
            value: value.to_owned(),
        })?;
    }
    Ok(())
}

fn current_view(session: &Session) -> Result<std::sync::Arc<QueryView>, CliError> {
    session
        .controller
        .snapshot()
        .inventory
        .query
        .clone()
        .ok_or_else(|| CliError::Internal("inventory has not loaded".into()))
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    session: &Session,
    args: InventoryArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let inventory_status = |s: &showroom_core::AppState| s.inventory.status;

    match args.command {
        InventoryCommand::List(filters) => {
            session.settled(inventory_status).await?;
            apply_filters(session, &filters)?;
            let state = session.settled(inventory_status).await?;

            let out = output::render_list(
                &global.output,
                &state.inventory.vehicles,
                |v| VehicleRow::from(v),
                |v| v.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        InventoryCommand::Facets(filters) => {
            session.settled(inventory_status).await?;
            apply_filters(session, &filters)?;
            session.settled(inventory_status).await?;

            let view = current_view(session)?;
            let out = output::render_single(&global.output, view.as_ref(), facets_detail, |_| {
                "facets".into()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        InventoryCommand::Show { id } => {
            let state = session.settled(inventory_status).await?;
            let vehicle = state
                .inventory
                .vehicles
                .iter()
                .find(|v| v.id == id)
                .cloned()
                .ok_or_else(|| CliError::NotFound {
                    resource_type: "vehicle".into(),
                    identifier: id,
                    list_command: "inventory list".into(),
                })?;

            session
                .controller
                .dispatch(Intent::SetCurrentVehicle(vehicle))?;
            let state = session.settled(inventory_status).await?;
            let Some(current) = state.current_vehicle.clone() else {
                return Err(CliError::Internal("vehicle detail was cleared".into()));
            };

            let out = output::render_single(&global.output, current.as_ref(), detail, |v| {
                v.id.clone()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        InventoryCommand::Add { from_file } => {
            let draft: VehicleDraft = util::read_json_file(&from_file)?;
            let result = session
                .controller
                .execute(CoreCommand::AddVehicle(draft))
                .await?;
            print_vehicle_result(result, "added", session.color(), global)
        }

        InventoryCommand::Update { id, from_file } => {
            let draft: VehicleDraft = util::read_json_file(&from_file)?;
            let result = session
                .controller
                .execute(CoreCommand::UpdateVehicle { id, draft })
                .await?;
            print_vehicle_result(result, "updated", session.color(), global)
        }

        InventoryCommand::Delete { ids } => {
            let prompt = format!("Delete {} vehicle(s)?", ids.len());
            if !util::confirm(&prompt, global.yes)? {
                return Ok(());
            }
            let count = ids.len();
            session
                .controller
                .execute(CoreCommand::DeleteVehicles { ids })
                .await?;
            output::success(
                &format!("Deleted {count} vehicle(s)"),
                session.color(),
                global.quiet,
            );
            Ok(())
        }
    }
}

fn print_vehicle_result(
    result: CommandResult,
    verb: &str,
    color: bool,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if let CommandResult::Vehicle(vehicle) = result {
        output::success(
            &format!("Vehicle {} {verb}", vehicle.id),
            color,
            global.quiet,
        );
        let out = output::render_single(&global.output, &vehicle, detail, |v| v.id.clone())?;
        output::print_output(&out, global.quiet);
    }
    Ok(())
}
