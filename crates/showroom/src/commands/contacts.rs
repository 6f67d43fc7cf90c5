//! Contact command handlers.

use tabled::Tabled;

use showroom_core::{AppState, Command as CoreCommand, CommandResult, Contact, ContactDraft, Intent};

use crate::cli::{ContactFields, ContactUpdate, ContactsArgs, ContactsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;
use crate::session::Session;

use super::util::{self, or_dash};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ContactRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Mobile")]
    mobile: String,
    #[tabled(rename = "Email")]
    email: String,
}

impl From<&Contact> for ContactRow {
    fn from(c: &Contact) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            mobile: c.mobile.clone(),
            email: or_dash(c.email.as_deref()),
        }
    }
}

fn detail(c: &Contact) -> String {
    [
        format!("ID:         {}", c.id),
        format!("Name:       {}", c.name),
        format!("Mobile:     {}", c.mobile),
        format!("Email:      {}", or_dash(c.email.as_deref())),
        format!("Address:    {}", or_dash(c.address.as_deref())),
        format!("Instagram:  {}", or_dash(c.instagram.as_deref())),
        format!("Facebook:   {}", or_dash(c.facebook.as_deref())),
    ]
    .join("\n")
}

// ── Draft construction ──────────────────────────────────────────────

fn new_draft(fields: ContactFields) -> ContactDraft {
    ContactDraft {
        name: fields.name,
        mobile: fields.mobile,
        email: fields.email,
        address: fields.address,
        instagram: fields.instagram,
        facebook: fields.facebook,
    }
}

/// The existing contact with every given field replaced.
fn merged_draft(existing: &Contact, update: ContactUpdate) -> ContactDraft {
    ContactDraft {
        name: update.name.unwrap_or_else(|| existing.name.clone()),
        mobile: update.mobile.unwrap_or_else(|| existing.mobile.clone()),
        email: update.email.or_else(|| existing.email.clone()),
        address: update.address.or_else(|| existing.address.clone()),
        instagram: update.instagram.or_else(|| existing.instagram.clone()),
        facebook: update.facebook.or_else(|| existing.facebook.clone()),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    session: &Session,
    args: ContactsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let contacts_status = |s: &AppState| s.contacts.status;

    match args.command {
        ContactsCommand::List { search } => {
            session.settled(contacts_status).await?;
            if let Some(text) = search {
                session.controller.dispatch(Intent::SetContactSearch(text))?;
            }
            let state = session.settled(contacts_status).await?;

            let out = output::render_list(
                &global.output,
                &state.contacts.contacts,
                |c| ContactRow::from(c),
                |c| c.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ContactsCommand::Add(fields) => {
            let result = session
                .controller
                .execute(CoreCommand::AddContact(new_draft(fields)))
                .await?;
            print_contact_result(result, "added", session.color(), global)
        }

        ContactsCommand::Update { id, fields } => {
            let state = session.settled(contacts_status).await?;
            let existing = state
                .contacts
                .contacts
                .iter()
                .find(|c| c.id == id)
                .ok_or_else(|| CliError::NotFound {
                    resource_type: "contact".into(),
                    identifier: id.clone(),
                    list_command: "contacts list".into(),
                })?;

            let draft = merged_draft(existing, fields);
            let result = session
                .controller
                .execute(CoreCommand::UpdateContact { id, draft })
                .await?;
            print_contact_result(result, "updated", session.color(), global)
        }

        ContactsCommand::Delete { ids } => {
            let prompt = format!("Delete {} contact(s)?", ids.len());
            if !util::confirm(&prompt, global.yes)? {
                return Ok(());
            }
            let count = ids.len();
            session
                .controller
                .execute(CoreCommand::DeleteContacts { ids })
                .await?;
            output::success(
                &format!("Deleted {count} contact(s)"),
                session.color(),
                global.quiet,
            );
            Ok(())
        }
    }
}

fn print_contact_result(
    result: CommandResult,
    verb: &str,
    color: bool,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if let CommandResult::Contact(contact) = result {
        output::success(&format!("Contact {} {verb}", contact.id), color, global.quiet);
        let out = output::render_single(&global.output, &contact, detail, |c| c.id.clone())?;
        output::print_output(&out, global.quiet);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_keeps_omitted_fields() {
        let existing = Contact {
            id: "c1".into(),
            name: "Budi Santoso".into(),
            mobile: "081234567890".into(),
            email: Some("budi@example.id".into()),
            address: Some("Jl. Sudirman 1".into()),
            instagram: None,
            facebook: None,
        };
        let draft = merged_draft(
            &existing,
            ContactUpdate {
                name: None,
                mobile: Some("081298765432".into()),
                email: None,
                address: None,
                instagram: Some("@budi".into()),
                facebook: None,
            },
        );

        assert_eq!(draft.name, "Budi Santoso");
        assert_eq!(draft.mobile, "081298765432");
        assert_eq!(draft.email.as_deref(), Some("budi@example.id"));
        assert_eq!(draft.instagram.as_deref(), Some("@budi"));
        assert!(draft.facebook.is_none());
    }
}
