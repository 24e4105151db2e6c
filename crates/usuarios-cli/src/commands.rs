use std::sync::Arc;

use anyhow::{bail, Context, Result};
use usuarios_api::{Credentials, Scheme, UserId, UsuariosClient};
use usuarios_directory::{
    login, Directory, FormField, LoginOutcome, RegistrationForm, SortDirection, SortField,
};

use crate::cli::UserFieldArgs;
use crate::render;

fn apply_fields(directory: &mut Directory, args: UserFieldArgs) {
    let inputs = [
        (FormField::FirstName, args.first_name),
        (FormField::LastName, args.last_name),
        (FormField::Email, args.email),
        (FormField::Username, args.username),
        (FormField::PasswordHash, args.hash),
        (FormField::PasswordMd5, args.md5),
        (FormField::PasswordSha1, args.sha1),
    ];
    for (field, value) in inputs {
        if let Some(value) = value {
            directory.set_field(field, value);
        }
    }
}

pub async fn cmd_list(
    client: UsuariosClient,
    search: String,
    sort: Option<SortField>,
    desc: bool,
    page: usize,
) -> Result<()> {
    let mut directory = Directory::new(Arc::new(client));
    directory
        .load()
        .await
        .context("could not load the user directory")?;

    if let Some(field) = sort {
        let direction = if desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        directory.set_sort(field, direction);
    }
    directory.set_search(search);
    directory.go_to_page(page);

    println!("{}", render::page_table(&directory.current_page()));
    Ok(())
}

pub async fn cmd_create(client: UsuariosClient, args: UserFieldArgs) -> Result<()> {
    let mut directory = Directory::new(Arc::new(client));
    directory.open_create();
    apply_fields(&mut directory, args);

    let created = directory.submit().await.context("could not create user")?;
    println!("Created {}", render::record_line(&created));
    Ok(())
}

pub async fn cmd_update(client: UsuariosClient, id: UserId, args: UserFieldArgs) -> Result<()> {
    let mut directory = Directory::new(Arc::new(client));
    directory
        .load()
        .await
        .context("could not load the user directory")?;
    directory.open_edit(id)?;
    apply_fields(&mut directory, args);

    let updated = directory
        .submit()
        .await
        .with_context(|| format!("could not update user {id}"))?;
    println!("Updated {}", render::record_line(&updated));
    Ok(())
}

pub async fn cmd_delete(client: UsuariosClient, id: UserId) -> Result<()> {
    let mut directory = Directory::new(Arc::new(client));
    directory
        .delete(id)
        .await
        .with_context(|| format!("could not delete user {id}"))?;
    println!("Deleted user {id}");
    Ok(())
}

pub async fn cmd_login(
    client: UsuariosClient,
    scheme: Scheme,
    username: String,
    password: String,
) -> Result<()> {
    let credentials = Credentials::new(username, password);
    match login(&client, scheme, &credentials).await {
        LoginOutcome::Granted { redirect } => {
            println!("Signed in with {scheme}; continue to {redirect}");
            Ok(())
        }
        LoginOutcome::Denied { alert } => bail!("{alert}"),
        LoginOutcome::Failed { alert, error } => Err(anyhow::Error::new(error).context(alert)),
    }
}

pub fn cmd_register(form: &RegistrationForm) -> Result<()> {
    let registration = form.submit()?;
    println!("Registration for {} <{}> is valid", registration.name, registration.email);
    Ok(())
}
