use clap::{Args, Parser, Subcommand};
use usuarios_api::{Scheme, UserId};
use usuarios_directory::SortField;

#[derive(Parser)]
#[command(name = "usuarios")]
#[command(about = "Browse and manage users of the password-hashing demo API.")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// API base URL (overrides USUARIOS_API_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Request timeout in seconds (overrides USUARIOS_TIMEOUT_SECS)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Retries for transient failures (overrides USUARIOS_MAX_RETRIES)
    #[arg(long, global = true)]
    pub max_retries: Option<u32>,

    /// Log requests at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show one page of the user table
    List {
        /// Keep users whose name, last name, email and username all contain this text
        #[arg(long, default_value = "")]
        search: String,

        /// Column to sort by (id, first-name, last-name, email, username, hash, md5, sha1, status)
        #[arg(long)]
        sort: Option<SortField>,

        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,

        /// Page number, starting at 1
        #[arg(long, default_value = "1")]
        page: usize,
    },

    /// Create a user
    Create(UserFieldArgs),

    /// Update fields of an existing user
    Update {
        /// User identifier
        id: UserId,

        #[command(flatten)]
        fields: UserFieldArgs,
    },

    /// Delete a user
    Delete {
        /// User identifier
        id: UserId,
    },

    /// Check credentials against one password scheme
    Login {
        /// Scheme to verify against (hash, md5, sha1, rsa)
        #[arg(long, default_value = "md5")]
        scheme: Scheme,

        /// Login name
        #[arg(long)]
        username: String,

        /// Password
        #[arg(long)]
        password: String,
    },

    /// Validate a registration form
    Register {
        /// Full name
        #[arg(long)]
        name: String,

        /// Email address
        #[arg(long)]
        email: String,

        /// Password
        #[arg(long)]
        password: String,

        /// Password confirmation
        #[arg(long)]
        confirm_password: String,
    },
}

/// Modal inputs; unset flags leave the field as it is.
#[derive(Debug, Args)]
pub struct UserFieldArgs {
    /// First name
    #[arg(long)]
    pub first_name: Option<String>,

    /// Last name
    #[arg(long)]
    pub last_name: Option<String>,

    /// Email
    #[arg(long)]
    pub email: Option<String>,

    /// Username
    #[arg(long)]
    pub username: Option<String>,

    /// Stored password hash
    #[arg(long)]
    pub hash: Option<String>,

    /// Stored password MD5
    #[arg(long)]
    pub md5: Option<String>,

    /// Stored password SHA-1
    #[arg(long)]
    pub sha1: Option<String>,
}
