use std::{
    error::Error,
    fmt::Display,
    io,
    process::exit,
    sync::{Arc, Mutex},
};

use clap::Parser;
use email_address::EmailAddress;
use rusqlite::Connection;

use fintrack_rs::{
    initialize_db,
    models::{PasswordHash, UserRole, ValidatedPassword},
    stores::{UserStore, sqlite::SQLiteUserStore},
};

/// A utility for creating a user account from the command line.
///
/// This is how the first administrator account is created on a fresh
/// database, before the HTTP API has any users.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The email address for the new user.
    #[arg(long)]
    email: String,

    /// Give the new user the administrator role.
    #[arg(long)]
    admin: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let email: EmailAddress = match args.email.parse() {
        Ok(email) => email,
        Err(error) => {
            print_error(format!("'{}' is not a valid email: {error}", args.email));
            exit(1);
        }
    };

    let conn = Connection::open(&args.db_path)?;
    initialize_db(&conn)?;

    let password_hash = match get_password_hash() {
        Some(password_hash) => password_hash,
        None => return Ok(()),
    };

    let role = if args.admin {
        UserRole::Admin
    } else {
        UserRole::User
    };

    let user = SQLiteUserStore::new(Arc::new(Mutex::new(conn))).create(
        email,
        password_hash,
        role,
    )?;

    println!(
        "Created {} user {} with ID {}.",
        user.role(),
        user.email(),
        user.id()
    );

    Ok(())
}

/// Prompt for a password twice and hash it.
///
/// Returns `None` if stdin was closed, which aborts user creation.
fn get_password_hash() -> Option<PasswordHash> {
    loop {
        println!();

        let first_password = match rpassword::prompt_password("Enter a password: ") {
            Ok(string) => string,
            Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => {
                return None;
            }
            Err(error) => {
                print_error(format!("Could not read password from stdin: {error}"));
                return None;
            }
        };

        let validated_password = match ValidatedPassword::new(&first_password) {
            Ok(password) => password,
            Err(error) => {
                print_error(error);
                continue;
            }
        };

        let second_password = match rpassword::prompt_password("Enter the same password again: ") {
            Ok(string) => string,
            Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => {
                return None;
            }
            Err(error) => {
                print_error(format!("Could not read password from stdin: {error}"));
                return None;
            }
        };

        if first_password != second_password {
            print_error("The passwords do not match, try again.");
            continue;
        }

        match PasswordHash::new(validated_password, PasswordHash::DEFAULT_COST) {
            Ok(password_hash) => return Some(password_hash),
            Err(error) => {
                print_error(format!("Could not hash the password: {error}"));
                return None;
            }
        }
    }
}

fn print_error(message: impl Display) {
    eprintln!("ERROR: {message}");
}
