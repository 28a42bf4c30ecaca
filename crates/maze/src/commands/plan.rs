use crate::reporter::ConsoleReporter;
use colored::Colorize;
use maze_client::MazeClient;
use maze_config::ProfileStore;
use maze_pipeline::{PipelineRunner, PlanRequest, Provider, RunOutcome, Step};
use std::path::PathBuf;

const RULE: &str = "--------------------------------------------------------------------------------";

/// Flags of `maze plan`
pub struct PlanArgs {
    pub dir: PathBuf,
    pub profile: String,
    pub url: String,
    pub name: String,
    pub provider: Option<String>,
    pub image: bool,
    pub description: String,
}

impl PlanArgs {
    fn into_request(self, provider: Provider) -> PlanRequest {
        PlanRequest {
            directory: self.dir,
            project_name: self.name,
            description: self.description,
            provider,
            generate_image: self.image,
            profile_name: self.profile,
            server_url: self.url,
        }
    }
}

pub async fn handle(args: PlanArgs) -> anyhow::Result<()> {
    let store = ProfileStore::open_default()?;

    println!(
        "{}",
        format!(
            "Planning project '{}' from {}",
            args.name,
            args.dir.display()
        )
        .blue()
        .bold()
    );

    let provider = {
        let stdin = std::io::stdin();
        Provider::resolve(
            args.provider.as_deref(),
            &mut stdin.lock(),
            &mut std::io::stdout(),
        )?
    };
    tracing::debug!("Provider: {} ({})", provider, provider.normalized());

    let request = args.into_request(provider);
    let client = MazeClient::new(&request.server_url);
    let reporter = ConsoleReporter::default();
    let runner = PipelineRunner::new(&client, &reporter, &store);

    match runner.run(&request).await? {
        RunOutcome::Completed(summary) => {
            println!();
            println!("{}", "Go to this url to view your canvas:".bold());
            println!("{}", RULE);
            println!("{}", summary.canvas_url.cyan());
            println!("{}", RULE);
            Ok(())
        }
        RunOutcome::Aborted { step, reason } => {
            if step == Step::Authenticate {
                println!(
                    "{}",
                    "Check your authentication token or selected profile and try again".yellow()
                );
            }
            anyhow::bail!("{}: {}", step.failure_message(), reason)
        }
    }
}
