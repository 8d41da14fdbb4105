use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

use licensure_codec::{DefaultRepositoryContext, JsonCodec};
use licensure_context::factories::{DefaultEncryptionFactory, Ed25519KeystoreFactory, KeyRole};
use licensure_context::Context;
use licensure_crypto::{Deflate, Password, StaticPasswordProtection};
use licensure_manager::{BaseLicenseManager, VendorManagerBuilder};
use licensure_model::{DistinguishedName, License};
use licensure_store::FileStore;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Generate, install, load, verify, and uninstall licensure artifacts",
    long_about = None
)]
struct Cli {
    /// Product subject every license is issued and checked against.
    #[arg(long, global = true, default_value = "App")]
    subject: String,

    /// Path to a raw 32-byte Ed25519 key file (seed for signing, public key
    /// for verifying).
    #[arg(long, global = true)]
    keystore: PathBuf,

    /// Secret used to derive the encryption key.
    #[arg(long, global = true, env = "LICENSURE_PASSWORD")]
    password: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate a signed, encrypted license artifact and write it to a file.
    Generate {
        /// Where to write the generated artifact.
        #[arg(long)]
        output: PathBuf,
        /// Number of consumers the generated key permits.
        #[arg(long, default_value_t = 1)]
        consumer_amount: i64,
        #[arg(long)]
        consumer_type: Option<String>,
        #[arg(long)]
        holder: Option<DistinguishedName>,
        #[arg(long)]
        issuer: Option<DistinguishedName>,
        #[arg(long)]
        not_before: Option<DateTime<Utc>>,
        #[arg(long)]
        not_after: Option<DateTime<Utc>>,
    },
    /// Verify a source artifact, then install it as the current license.
    Install {
        /// The artifact to read and verify.
        #[arg(long)]
        source: PathBuf,
        /// Where the installed license is kept.
        #[arg(long)]
        store: PathBuf,
    },
    /// Print the installed license as JSON, without checking its validity window.
    Load {
        #[arg(long)]
        store: PathBuf,
    },
    /// Print the installed license as JSON, after checking its validity window.
    Verify {
        #[arg(long)]
        store: PathBuf,
    },
    /// Authenticate and remove the installed license.
    Uninstall {
        #[arg(long)]
        store: PathBuf,
    },
}

fn build_context(subject: &str) -> Result<Arc<Context>> {
    let context = Context::builder()
        .codec(Arc::new(JsonCodec::new()))
        .compression(Arc::new(Deflate::new()))
        .encryption_algorithm("AES-256-GCM")
        .encryption_factory(Arc::new(DefaultEncryptionFactory))
        .authentication_factory(Arc::new(Ed25519KeystoreFactory))
        .repository_context(Arc::new(DefaultRepositoryContext))
        .keystore_type("raw-ed25519")
        .subject(subject)
        .build()
        .context("building context")?;
    Ok(Arc::new(context))
}

fn vendor_manager(
    context: Arc<Context>,
    keystore: PathBuf,
    password: String,
    role: KeyRole,
    store: Option<PathBuf>,
) -> Result<BaseLicenseManager> {
    let password = Arc::new(StaticPasswordProtection::new(Password::new(password)));
    let mut builder = VendorManagerBuilder::new(context)
        .authentication_from("cli", Arc::new(FileStore::new(keystore)), role)
        .encryption_with(password);
    if let Some(store) = store {
        builder = builder.store_in(Arc::new(FileStore::new(store)));
    }
    builder.build().context("building manager")
}

fn main() -> Result<()> {
    licensure_manager::telemetry::init_tracing();
    let cli = Cli::parse();
    let context = build_context(&cli.subject)?;

    match cli.command {
        Commands::Generate {
            output,
            consumer_amount,
            consumer_type,
            holder,
            issuer,
            not_before,
            not_after,
        } => {
            let manager = vendor_manager(context, cli.keystore, cli.password, KeyRole::Signing, None)?;
            let mut bean = License::new();
            bean.consumer_amount = Some(consumer_amount);
            bean.consumer_type = consumer_type;
            bean.holder = holder;
            bean.issuer = issuer;
            bean.not_before = not_before;
            bean.not_after = not_after;

            let generator = manager.generate_key_from(bean)?;
            generator.save_to(&FileStore::new(output))?;
            println!("{}", serde_json::to_string_pretty(&generator.license()?)?);
        }
        Commands::Install { source, store } => {
            let manager = vendor_manager(context, cli.keystore, cli.password, KeyRole::Verifying, Some(store))?;
            manager.install(&FileStore::new(source))?;
            println!("installed");
        }
        Commands::Load { store } => {
            let manager = vendor_manager(context, cli.keystore, cli.password, KeyRole::Verifying, Some(store))?;
            println!("{}", serde_json::to_string_pretty(&manager.load()?)?);
        }
        Commands::Verify { store } => {
            let manager = vendor_manager(context, cli.keystore, cli.password, KeyRole::Verifying, Some(store))?;
            println!("{}", serde_json::to_string_pretty(&manager.verify()?)?);
        }
        Commands::Uninstall { store } => {
            let manager = vendor_manager(context, cli.keystore, cli.password, KeyRole::Verifying, Some(store))?;
            manager.uninstall()?;
            println!("uninstalled");
        }
    }
    Ok(())
}
