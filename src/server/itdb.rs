use std::sync::Arc;

use axum::{
    Router,
    extract::{Form, Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
};

use super::dto::{PcForm, PrinterForm};
use super::render;
use super::response::{PageError, StoreResultExt, redirect};
use crate::auth::RequireItdb;
use crate::error::Error;
use crate::server::AppState;
use crate::store::Store;
use crate::types::{NewPrinter, Office, parse_printer_field};

pub fn itdb_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(page_itdb))
        .route("/setting", get(page_setting))
        .route("/pc/{office}", get(pc_list))
        .route("/pc/{office}/add", get(pc_add))
        .route("/pc/{office}/add/submit", post(pc_add_submit))
        .route("/pc/{office}/edit/{id}", get(pc_edit))
        .route("/pc/{office}/edit/{id}/submit", post(pc_edit_submit))
        .route("/pc/{office}/view/{id}", get(pc_view))
        .route("/pc/{office}/delete/{id}", get(pc_delete))
        .route("/printer/{office}", get(printer_list))
        .route("/printer/{office}/add", get(printer_add))
        .route("/printer/{office}/add/submit", post(printer_add_submit))
        .route("/printer/{office}/edit/{rowid}", get(printer_edit))
        .route("/printer/{office}/edit/{rowid}/submit", post(printer_edit_submit))
}

async fn page_itdb(RequireItdb(user): RequireItdb) -> Response {
    render::itdb_home_page(&user).into_response()
}

async fn page_setting(RequireItdb(user): RequireItdb) -> Response {
    render::itdb_setting_page(&user).into_response()
}

// PC pages

async fn pc_list(
    RequireItdb(user): RequireItdb,
    State(state): State<Arc<AppState>>,
    Path(office): Path<String>,
) -> Result<Response, PageError> {
    // An unknown office yields an empty listing, not an error.
    let pcs = match Office::parse(&office) {
        Some(selected) => state.store.list_pcs(selected).page_err("failed to list PCs")?,
        None => Vec::new(),
    };

    Ok(render::pc_list_page(&user, &office, &pcs).into_response())
}

async fn pc_add(
    RequireItdb(user): RequireItdb,
    State(state): State<Arc<AppState>>,
    Path(office): Path<String>,
) -> Result<Response, PageError> {
    let printers = match Office::parse(&office) {
        Some(selected) => state
            .store
            .list_printers_without_host(selected)
            .page_err("failed to list unassigned printers")?,
        None => Vec::new(),
    };

    let action = format!("/itdb/pc/{office}/add/submit");
    Ok(render::pc_form_page(&user, &office, &action, None, &printers).into_response())
}

async fn pc_add_submit(
    RequireItdb(_user): RequireItdb,
    State(state): State<Arc<AppState>>,
    Path(office): Path<String>,
    Form(form): Form<PcForm>,
) -> Result<Response, PageError> {
    let Some(selected) = Office::parse(&office) else {
        // Mutations against an unknown office are silent no-ops.
        return Ok(redirect("/itdb"));
    };

    let linked = parse_printer_field(&form.printer);
    let id = state
        .store
        .insert_pc(selected, &form.into())
        .page_err("failed to insert PC")?;
    state
        .store
        .sync_pc_printers(selected, id, &linked)
        .page_err("failed to link printers")?;

    Ok(redirect(&format!("/itdb/pc/{office}")))
}

async fn pc_edit(
    RequireItdb(user): RequireItdb,
    State(state): State<Arc<AppState>>,
    Path((office, id)): Path<(String, i64)>,
) -> Result<Response, PageError> {
    let Some(selected) = Office::parse(&office) else {
        return Ok(redirect("/itdb"));
    };

    let Some(pc) = state.store.get_pc(selected, id).page_err("failed to read PC")? else {
        return Ok(redirect(&format!("/itdb/pc/{office}")));
    };

    // Offer the printers that are free plus the ones already on this PC.
    let printers: Vec<_> = state
        .store
        .list_printers(selected)
        .page_err("failed to list printers")?
        .into_iter()
        .filter(|printer| printer.host.is_none() || printer.host == Some(id))
        .collect();

    let action = format!("/itdb/pc/{office}/edit/{id}/submit");
    Ok(render::pc_form_page(&user, &office, &action, Some(&pc), &printers).into_response())
}

async fn pc_edit_submit(
    RequireItdb(_user): RequireItdb,
    State(state): State<Arc<AppState>>,
    Path((office, id)): Path<(String, i64)>,
    Form(form): Form<PcForm>,
) -> Result<Response, PageError> {
    let Some(selected) = Office::parse(&office) else {
        return Ok(redirect("/itdb"));
    };

    let linked = parse_printer_field(&form.printer);
    let updated = state.store.update_pc(selected, id, &form.into());
    if matches!(updated, Err(Error::NotFound)) {
        // The row was deleted while the form was open; a stale submit is
        // a no-op.
        return Ok(redirect(&format!("/itdb/pc/{office}")));
    }
    updated.page_err("failed to update PC")?;
    state
        .store
        .sync_pc_printers(selected, id, &linked)
        .page_err("failed to relink printers")?;

    Ok(redirect(&format!("/itdb/pc/{office}")))
}

async fn pc_view(
    RequireItdb(user): RequireItdb,
    State(state): State<Arc<AppState>>,
    Path((office, id)): Path<(String, i64)>,
) -> Result<Response, PageError> {
    let Some(selected) = Office::parse(&office) else {
        return Ok(redirect("/itdb"));
    };

    let Some(pc) = state.store.get_pc(selected, id).page_err("failed to read PC")? else {
        return Ok(redirect(&format!("/itdb/pc/{office}")));
    };

    let hosted: Vec<_> = state
        .store
        .list_printers(selected)
        .page_err("failed to list printers")?
        .into_iter()
        .filter(|printer| printer.host == Some(id))
        .collect();

    Ok(render::pc_view_page(&user, &office, &pc, &hosted).into_response())
}

async fn pc_delete(
    RequireItdb(_user): RequireItdb,
    State(state): State<Arc<AppState>>,
    Path((office, id)): Path<(String, i64)>,
) -> Result<Response, PageError> {
    let Some(selected) = Office::parse(&office) else {
        return Ok(redirect("/itdb"));
    };

    state
        .store
        .delete_pc(selected, id)
        .page_err("failed to delete PC")?;
    // Clear the dangling back-references of its printers.
    state
        .store
        .sync_pc_printers(selected, id, &[])
        .page_err("failed to unlink printers")?;

    Ok(redirect(&format!("/itdb/pc/{office}")))
}

// Printer pages

async fn printer_list(
    RequireItdb(user): RequireItdb,
    State(state): State<Arc<AppState>>,
    Path(office): Path<String>,
) -> Result<Response, PageError> {
    let printers = match Office::parse(&office) {
        Some(selected) => state
            .store
            .list_printers(selected)
            .page_err("failed to list printers")?,
        None => Vec::new(),
    };

    Ok(render::printer_list_page(&user, &office, &printers).into_response())
}

async fn printer_add(RequireItdb(user): RequireItdb, Path(office): Path<String>) -> Response {
    let action = format!("/itdb/printer/{office}/add/submit");
    render::printer_form_page(&user, &office, &action, None).into_response()
}

async fn printer_add_submit(
    RequireItdb(_user): RequireItdb,
    State(state): State<Arc<AppState>>,
    Path(office): Path<String>,
    Form(form): Form<PrinterForm>,
) -> Result<Response, PageError> {
    let Some(selected) = Office::parse(&office) else {
        return Ok(redirect("/itdb"));
    };

    let printer: NewPrinter = form.into();
    let host = printer.host;
    let rowid = state
        .store
        .insert_printer(selected, &printer)
        .page_err("failed to insert printer")?;

    relink_printer(state.store.as_ref(), selected, rowid, None, host)?;

    Ok(redirect(&format!("/itdb/printer/{office}")))
}

async fn printer_edit(
    RequireItdb(user): RequireItdb,
    State(state): State<Arc<AppState>>,
    Path((office, rowid)): Path<(String, i64)>,
) -> Result<Response, PageError> {
    let Some(selected) = Office::parse(&office) else {
        return Ok(redirect("/itdb"));
    };

    let Some(printer) = state
        .store
        .get_printer(selected, rowid)
        .page_err("failed to read printer")?
    else {
        return Ok(redirect(&format!("/itdb/printer/{office}")));
    };

    let action = format!("/itdb/printer/{office}/edit/{rowid}/submit");
    Ok(render::printer_form_page(&user, &office, &action, Some(&printer)).into_response())
}

async fn printer_edit_submit(
    RequireItdb(_user): RequireItdb,
    State(state): State<Arc<AppState>>,
    Path((office, rowid)): Path<(String, i64)>,
    Form(form): Form<PrinterForm>,
) -> Result<Response, PageError> {
    let Some(selected) = Office::parse(&office) else {
        return Ok(redirect("/itdb"));
    };

    let Some(existing) = state
        .store
        .get_printer(selected, rowid)
        .page_err("failed to read printer")?
    else {
        return Ok(redirect(&format!("/itdb/printer/{office}")));
    };

    let printer: NewPrinter = form.into();
    let new_host = printer.host;
    let updated = state.store.update_printer(selected, rowid, &printer);
    if matches!(updated, Err(Error::NotFound)) {
        return Ok(redirect(&format!("/itdb/printer/{office}")));
    }
    updated.page_err("failed to update printer")?;

    relink_printer(state.store.as_ref(), selected, rowid, existing.host, new_host)?;

    Ok(redirect(&format!("/itdb/printer/{office}")))
}

/// Keeps the PC side of the linkage in step when a printer's host changes:
/// the rowid is removed from the old host's printer field and appended to
/// the new host's. Independent statements; the usual caveat about
/// concurrent edits applies.
fn relink_printer(
    store: &dyn Store,
    office: Office,
    rowid: i64,
    old_host: Option<i64>,
    new_host: Option<i64>,
) -> Result<(), PageError> {
    if old_host == new_host {
        return Ok(());
    }

    if let Some(pc_id) = old_host {
        if let Some(pc) = store.get_pc(office, pc_id).page_err("failed to read old host PC")? {
            let remaining: Vec<String> = pc
                .printer_rowids()
                .into_iter()
                .filter(|linked| *linked != rowid)
                .map(|linked| linked.to_string())
                .collect();
            store
                .set_pc_printer_field(office, pc_id, &remaining.join(" "))
                .page_err("failed to update old host PC")?;
        }
    }

    if let Some(pc_id) = new_host {
        if let Some(pc) = store.get_pc(office, pc_id).page_err("failed to read new host PC")? {
            let mut linked = pc.printer_rowids();
            if !linked.contains(&rowid) {
                linked.push(rowid);
            }
            let joined: Vec<String> = linked.into_iter().map(|l| l.to_string()).collect();
            store
                .set_pc_printer_field(office, pc_id, &joined.join(" "))
                .page_err("failed to update new host PC")?;
        }
    }

    Ok(())
}
