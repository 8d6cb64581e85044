//! Server-side HTML rendering.
//!
//! Page markup is deliberately minimal; the interesting part is that every
//! page takes the acting [`CurrentUser`] explicitly and derives its
//! navigation from pure permission checks.

use axum::response::Html;

use crate::auth::CurrentUser;
use crate::types::{Pc, Permission, Printer, Role, User};

pub const VERSION: &str = "version 1.0.0";

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn nav(user: Option<&CurrentUser>) -> String {
    let mut links = vec![r#"<a href="/">Home</a>"#.to_string()];
    if let Some(user) = user {
        links.push(r#"<a href="/user">My Page</a>"#.to_string());
        links.push(r#"<a href="/user/account">Account</a>"#.to_string());
        if user.may(Permission::AccessItdb) {
            links.push(r#"<a href="/itdb">ITDB</a>"#.to_string());
        }
        if user.may(Permission::AccessAdmin) {
            links.push(r#"<a href="/admin">Admin</a>"#.to_string());
        }
        links.push(r#"<a href="/user/logout">Logout</a>"#.to_string());
    }
    links.push(r#"<a href="/about">About</a>"#.to_string());
    links.join(" | ")
}

fn layout(title: &str, user: Option<&CurrentUser>, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html><head><title>{title} - deskreg</title>\
         <link rel=\"stylesheet\" href=\"/asset/style.css\"></head>\
         <body><nav>{nav}</nav><main><h1>{title}</h1>{body}</main>\
         </body></html>",
        title = escape(title),
        nav = nav(user),
        body = body,
    ))
}

fn message_block(message: Option<&str>) -> String {
    match message {
        Some(message) => format!("<p class=\"message\">{}</p>", escape(message)),
        None => String::new(),
    }
}

pub fn index_page(message: Option<&str>) -> Html<String> {
    let body = format!(
        "{message}\
         <form method=\"post\" action=\"/user/login\">\
         <label>Username <input name=\"username\"></label>\
         <label>Password <input name=\"password\" type=\"password\"></label>\
         <button type=\"submit\">Log in</button></form>\
         <footer>{VERSION}</footer>",
        message = message_block(message),
    );
    layout("Welcome", None, &body)
}

pub fn about_page() -> Html<String> {
    layout(
        "About",
        None,
        &format!("<p>Internal asset and user management.</p><footer>{VERSION}</footer>"),
    )
}

pub fn user_home_page(user: &CurrentUser) -> Html<String> {
    let body = format!(
        "<p>Hello, {username}.</p><p>Logged on {logged_on}.</p>",
        username = escape(&user.username),
        logged_on = escape(&user.logged_on),
    );
    layout("My Page", Some(user), &body)
}

pub fn account_page(user: &CurrentUser, record: &User) -> Html<String> {
    let tier = Role::parse(&record.usergroup)
        .map(Role::describe)
        .unwrap_or("No usergroup is defined for this account");
    let body = format!(
        "<dl>\
         <dt>Id</dt><dd>{id}</dd>\
         <dt>Username</dt><dd>{username}</dd>\
         <dt>Email</dt><dd>{email}</dd>\
         <dt>Usergroup</dt><dd>{usergroup}</dd>\
         </dl><p>{tier}</p>\
         <p><a href=\"/user/password\">Change password</a></p>",
        id = escape(&record.id),
        username = escape(&record.username),
        email = escape(&record.email),
        usergroup = escape(&record.usergroup),
    );
    layout("Account", Some(user), &body)
}

pub fn password_page(user: &CurrentUser, message: Option<&str>) -> Html<String> {
    let target_field = if user.may(Permission::UpdateUserPassword) {
        format!(
            "<label>Username <input name=\"username\" value=\"{}\"></label>",
            escape(&user.username)
        )
    } else {
        format!(
            "<input type=\"hidden\" name=\"username\" value=\"{}\">",
            escape(&user.username)
        )
    };
    let body = format!(
        "{message}\
         <form method=\"post\" action=\"/user/password/update\">\
         {target_field}\
         <label>Old password <input name=\"old_password\" type=\"password\"></label>\
         <label>New password <input name=\"new_password\" type=\"password\"></label>\
         <label>Confirm <input name=\"confirm_password\" type=\"password\"></label>\
         <button type=\"submit\">Update</button></form>",
        message = message_block(message),
    );
    layout("Change Password", Some(user), &body)
}

pub fn admin_home_page(user: &CurrentUser, record: &User) -> Html<String> {
    let body = format!(
        "<p>Signed in as {username} ({usergroup}).</p>\
         <ul><li><a href=\"/admin/usermanagement\">User management</a></li></ul>",
        username = escape(&record.username),
        usergroup = escape(&record.usergroup),
    );
    layout("Administration", Some(user), &body)
}

pub fn user_management_page(user: &CurrentUser, users: &[User]) -> Html<String> {
    let rows: String = users
        .iter()
        .map(|u| {
            format!(
                "<tr><td>{id}</td><td>{username}</td><td>{email}</td><td>{usergroup}</td>\
                 <td><a href=\"/admin/usermanagement/deleteuser/{id}\">delete</a></td></tr>",
                id = escape(&u.id),
                username = escape(&u.username),
                email = escape(&u.email),
                usergroup = escape(&u.usergroup),
            )
        })
        .collect();
    let body = format!(
        "<p><a href=\"/admin/usermanagement/newuser\">New user</a></p>\
         <table><tr><th>Id</th><th>Username</th><th>Email</th><th>Usergroup</th><th></th></tr>\
         {rows}</table>",
    );
    layout("User Management", Some(user), &body)
}

pub fn new_user_page(user: &CurrentUser, message: Option<&str>) -> Html<String> {
    let body = format!(
        "{message}\
         <form method=\"post\" action=\"/admin/usermanagement/newuser/submit\">\
         <label>Username <input name=\"username\"></label>\
         <label>Email <input name=\"email\"></label>\
         <label>Password <input name=\"password\" type=\"password\"></label>\
         <label>Usergroup <select name=\"usergroup\">\
         <option value=\"normal\">normal</option>\
         <option value=\"admin\">admin</option>\
         </select></label>\
         <button type=\"submit\">Create</button></form>",
        message = message_block(message),
    );
    layout("New User", Some(user), &body)
}

fn office_links(prefix: &str) -> String {
    crate::types::Office::ALL
        .iter()
        .map(|office| format!("<a href=\"{prefix}/{office}\">{office}</a>"))
        .collect::<Vec<_>>()
        .join(" | ")
}

pub fn itdb_home_page(user: &CurrentUser) -> Html<String> {
    let body = format!(
        "<p>PCs: {pc}</p><p>Printers: {printer}</p>\
         <p><a href=\"/itdb/setting\">Settings</a></p>",
        pc = office_links("/itdb/pc"),
        printer = office_links("/itdb/printer"),
    );
    layout("IT Database", Some(user), &body)
}

pub fn itdb_setting_page(user: &CurrentUser) -> Html<String> {
    layout(
        "ITDB Settings",
        Some(user),
        "<p>No configurable settings yet.</p>",
    )
}

pub fn pc_list_page(user: &CurrentUser, office: &str, pcs: &[Pc]) -> Html<String> {
    let rows: String = pcs
        .iter()
        .map(|pc| {
            format!(
                "<tr><td>{id}</td><td>{hostname}</td><td>{ip}</td><td>{pc_user}</td>\
                 <td>{department}</td>\
                 <td><a href=\"/itdb/pc/{office}/view/{id}\">view</a> \
                 <a href=\"/itdb/pc/{office}/edit/{id}\">edit</a> \
                 <a href=\"/itdb/pc/{office}/delete/{id}\">delete</a></td></tr>",
                id = pc.id,
                hostname = escape(&pc.hostname),
                ip = escape(&pc.ip),
                pc_user = escape(&pc.user),
                department = escape(&pc.department),
                office = escape(office),
            )
        })
        .collect();
    let body = format!(
        "<p><a href=\"/itdb/pc/{office}/add\">Add PC</a></p>\
         <table><tr><th>Id</th><th>Hostname</th><th>IP</th><th>User</th>\
         <th>Department</th><th></th></tr>{rows}</table>",
        office = escape(office),
    );
    layout(&format!("PCs - {office}"), Some(user), &body)
}

fn pc_fields(pc: Option<&Pc>) -> String {
    let value = |get: fn(&Pc) -> &str| pc.map(get).map(escape).unwrap_or_default();
    [
        ("hostname", "Hostname", value(|pc| &pc.hostname)),
        ("ip", "IP", value(|pc| &pc.ip)),
        ("cpu_model", "CPU model", value(|pc| &pc.cpu_model)),
        ("cpu_no", "CPU serial", value(|pc| &pc.cpu_no)),
        ("monitor_model", "Monitor model", value(|pc| &pc.monitor_model)),
        ("monitor_no", "Monitor serial", value(|pc| &pc.monitor_no)),
        ("printer", "Printer rowids", value(|pc| &pc.printer)),
        ("user", "User", value(|pc| &pc.user)),
        ("department", "Department", value(|pc| &pc.department)),
        ("notes", "Notes", value(|pc| &pc.notes)),
    ]
    .into_iter()
    .map(|(name, label, value)| {
        format!("<label>{label} <input name=\"{name}\" value=\"{value}\"></label>")
    })
    .collect()
}

pub fn pc_form_page(
    user: &CurrentUser,
    office: &str,
    action: &str,
    pc: Option<&Pc>,
    available_printers: &[Printer],
) -> Html<String> {
    let printers: String = available_printers
        .iter()
        .map(|printer| {
            format!(
                "<li>{rowid}: {model} ({nickname})</li>",
                rowid = printer.rowid,
                model = escape(&printer.model),
                nickname = escape(&printer.nickname),
            )
        })
        .collect();
    let title = if pc.is_some() { "Edit PC" } else { "Add PC" };
    let body = format!(
        "<form method=\"post\" action=\"{action}\">{fields}\
         <button type=\"submit\">Save</button></form>\
         <p>Available printers:</p><ul>{printers}</ul>",
        action = escape(action),
        fields = pc_fields(pc),
    );
    layout(&format!("{title} - {office}"), Some(user), &body)
}

pub fn pc_view_page(
    user: &CurrentUser,
    office: &str,
    pc: &Pc,
    hosted_printers: &[Printer],
) -> Html<String> {
    let printers: String = hosted_printers
        .iter()
        .map(|printer| {
            format!(
                "<li>{rowid}: {model} ({nickname})</li>",
                rowid = printer.rowid,
                model = escape(&printer.model),
                nickname = escape(&printer.nickname),
            )
        })
        .collect();
    let body = format!(
        "<dl>\
         <dt>Hostname</dt><dd>{hostname}</dd>\
         <dt>IP</dt><dd>{ip}</dd>\
         <dt>CPU</dt><dd>{cpu_model} {cpu_no}</dd>\
         <dt>Monitor</dt><dd>{monitor_model} {monitor_no}</dd>\
         <dt>User</dt><dd>{pc_user}</dd>\
         <dt>Department</dt><dd>{department}</dd>\
         <dt>Notes</dt><dd>{notes}</dd>\
         </dl><p>Printers:</p><ul>{printers}</ul>\
         <p><a href=\"/itdb/pc/{office}/edit/{id}\">edit</a></p>",
        hostname = escape(&pc.hostname),
        ip = escape(&pc.ip),
        cpu_model = escape(&pc.cpu_model),
        cpu_no = escape(&pc.cpu_no),
        monitor_model = escape(&pc.monitor_model),
        monitor_no = escape(&pc.monitor_no),
        pc_user = escape(&pc.user),
        department = escape(&pc.department),
        notes = escape(&pc.notes),
        office = escape(office),
        id = pc.id,
    );
    layout(&format!("PC {} - {office}", pc.id), Some(user), &body)
}

pub fn printer_list_page(user: &CurrentUser, office: &str, printers: &[Printer]) -> Html<String> {
    let rows: String = printers
        .iter()
        .map(|printer| {
            let host = printer
                .host
                .map(|host| host.to_string())
                .unwrap_or_else(|| "-".to_string());
            format!(
                "<tr><td>{rowid}</td><td>{model}</td><td>{serial_no}</td>\
                 <td>{printer_type}</td><td>{host}</td><td>{nickname}</td>\
                 <td><a href=\"/itdb/printer/{office}/edit/{rowid}\">edit</a></td></tr>",
                rowid = printer.rowid,
                model = escape(&printer.model),
                serial_no = escape(&printer.serial_no),
                printer_type = escape(&printer.printer_type),
                nickname = escape(&printer.nickname),
                office = escape(office),
            )
        })
        .collect();
    let body = format!(
        "<p><a href=\"/itdb/printer/{office}/add\">Add printer</a></p>\
         <table><tr><th>Rowid</th><th>Model</th><th>Serial</th><th>Type</th>\
         <th>Host PC</th><th>Nickname</th><th></th></tr>{rows}</table>",
        office = escape(office),
    );
    layout(&format!("Printers - {office}"), Some(user), &body)
}

pub fn printer_form_page(
    user: &CurrentUser,
    office: &str,
    action: &str,
    printer: Option<&Printer>,
) -> Html<String> {
    let value = |get: fn(&Printer) -> &str| printer.map(get).map(escape).unwrap_or_default();
    let notes = printer
        .and_then(|printer| printer.notes.as_deref())
        .map(escape)
        .unwrap_or_default();
    let host = printer
        .and_then(|printer| printer.host)
        .map(|host| host.to_string())
        .unwrap_or_default();
    let title = if printer.is_some() {
        "Edit Printer"
    } else {
        "Add Printer"
    };
    let body = format!(
        "<form method=\"post\" action=\"{action}\">\
         <label>Model <input name=\"model\" value=\"{model}\"></label>\
         <label>Serial <input name=\"serial_no\" value=\"{serial_no}\"></label>\
         <label>Type <input name=\"printer_type\" value=\"{printer_type}\"></label>\
         <label>Notes <input name=\"notes\" value=\"{notes}\"></label>\
         <label>Host PC id <input name=\"host\" value=\"{host}\"></label>\
         <label>Nickname <input name=\"nickname\" value=\"{nickname}\"></label>\
         <button type=\"submit\">Save</button></form>",
        action = escape(action),
        model = value(|printer| &printer.model),
        serial_no = value(|printer| &printer.serial_no),
        printer_type = value(|printer| &printer.printer_type),
        nickname = value(|printer| &printer.nickname),
    );
    layout(&format!("{title} - {office}"), Some(user), &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("a<b>&\"c\""), "a&lt;b&gt;&amp;&quot;c&quot;");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_nav_is_permission_gated() {
        let normal = CurrentUser {
            id: "u1".to_string(),
            username: "alice".to_string(),
            logged_on: String::new(),
            role: Some(Role::Normal),
        };
        let admin = CurrentUser {
            id: "u2".to_string(),
            username: "root".to_string(),
            logged_on: String::new(),
            role: Some(Role::Admin),
        };

        let normal_nav = nav(Some(&normal));
        assert!(!normal_nav.contains("/admin"));
        assert!(!normal_nav.contains("/itdb"));

        let admin_nav = nav(Some(&admin));
        assert!(admin_nav.contains("/admin"));
        assert!(admin_nav.contains("/itdb"));

        assert!(!nav(None).contains("/user/logout"));
    }

    #[test]
    fn test_index_page_carries_message() {
        let page = index_page(Some("wrong username or password"));
        assert!(page.0.contains("wrong username or password"));
        assert!(index_page(None).0.contains("Log in"));
    }
}
