use clap::Parser;
use ospolicy::cli::{
    apply, assignments, handle_completions, handle_config_init, load_config, resolve_parent,
    Cli, Commands, ConfigCommands,
};
use ospolicy::client::AssignmentClient;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = run(cli).await;

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Get(args) => {
            let config = load_config(&args.config)?;
            ospolicy::logging::init_tracing(&config.logging).ok();
            let parent = resolve_parent(&config, &args.project, &args.location)?;
            let client = AssignmentClient::new(config)?;
            let output = assignments::handle_get(&args, &client, &parent).await?;
            println!("{output}");
        }
        Commands::List(args) => {
            let config = load_config(&args.config)?;
            ospolicy::logging::init_tracing(&config.logging).ok();
            let parent = resolve_parent(&config, &args.project, &args.location)?;
            let client = AssignmentClient::new(config)?;
            let output = assignments::handle_list(&args, &client, &parent).await?;
            println!("{output}");
        }
        Commands::Apply(args) => {
            let config = load_config(&args.config)?;
            ospolicy::logging::init_tracing(&config.logging).ok();
            let parent = resolve_parent(&config, &args.project, &args.location)?;
            let client = AssignmentClient::new(config)?;
            let output = apply::handle_apply(&args, &client, &parent).await?;
            println!("{output}");
        }
        Commands::Delete(args) => {
            let config = load_config(&args.config)?;
            ospolicy::logging::init_tracing(&config.logging).ok();
            let parent = resolve_parent(&config, &args.project, &args.location)?;
            let client = AssignmentClient::new(config)?;
            let output = assignments::handle_delete(&args, &client, &parent).await?;
            println!("{output}");
        }
        Commands::DeleteAll(args) => {
            let config = load_config(&args.config)?;
            ospolicy::logging::init_tracing(&config.logging).ok();
            let parent = resolve_parent(&config, &args.project, &args.location)?;
            let client = AssignmentClient::new(config)?;
            let output = assignments::handle_delete_all(&args, &client, &parent).await?;
            println!("{output}");
        }
        Commands::Config(ConfigCommands::Init(args)) => handle_config_init(&args)?,
        Commands::Completions(args) => handle_completions(&args),
    }

    Ok(())
}
