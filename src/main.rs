use clap::{ArgAction, Parser, Subcommand};
use global_tagging::schemas::Resource;
use global_tagging::{
    Config, DeleteTagAllOptions, DeleteTagOptions, GlobalTaggingV1, ListTagsOptions, OrderByName,
    Provider, TagRequest,
};
use serde::de::DeserializeOwned;
use std::fmt;

#[derive(Parser)]
struct Args {
    /// Prefix of the `<NAME>_*` environment variables to read.
    #[clap(long, default_value = GlobalTaggingV1::DEFAULT_SERVICE_NAME)]
    service_name: String,
    /// JSON configuration, used instead of the environment.
    #[clap(long, value_parser = parse_json::<Config>)]
    config: Option<Config>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    List {
        #[clap(long, value_delimiter = ',')]
        providers: Vec<Provider>,
        #[clap(long)]
        attached_to: Option<String>,
        #[clap(long)]
        full_data: Option<bool>,
        #[clap(long)]
        offset: Option<i64>,
        #[clap(long)]
        limit: Option<i64>,
        #[clap(long)]
        order_by_name: Option<OrderByName>,
        #[clap(long)]
        timeout: Option<i64>,
        #[clap(long)]
        attached_only: Option<bool>,
    },
    DeleteAll {
        #[clap(long)]
        providers: Option<Provider>,
    },
    Delete {
        tag_name: String,
        #[clap(long, value_delimiter = ',')]
        providers: Vec<Provider>,
    },
    Attach(TagArgs),
    Detach(TagArgs),
}

#[derive(clap::Args)]
struct TagArgs {
    #[clap(long = "resource", required = true, action = ArgAction::Append)]
    resources: Vec<String>,
    #[clap(long)]
    resource_type: Option<String>,
    #[clap(long)]
    tag_name: Option<String>,
    #[clap(long, value_delimiter = ',')]
    tag_names: Vec<String>,
}

impl TagArgs {
    fn into_request(self) -> anyhow::Result<TagRequest> {
        let resources = self
            .resources
            .into_iter()
            .map(|resource_id| {
                let resource = Resource::new(resource_id)?;
                Ok(match &self.resource_type {
                    Some(resource_type) => resource.with_resource_type(resource_type),
                    None => resource,
                })
            })
            .collect::<anyhow::Result<_>>()?;
        Ok(TagRequest {
            resources,
            tag_name: self.tag_name,
            tag_names: non_empty(self.tag_names),
            ..Default::default()
        })
    }
}

fn parse_json<T>(s: &str) -> Result<T, serde_json::Error>
where
    T: DeserializeOwned,
{
    serde_json::from_str(s)
}

fn non_empty<T>(v: Vec<T>) -> Option<Vec<T>> {
    if v.is_empty() { None } else { Some(v) }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let service = match args.config {
        Some(config) => GlobalTaggingV1::from_config(config)?,
        None => GlobalTaggingV1::new_instance(&args.service_name)?,
    };

    match args.command {
        Command::List {
            providers,
            attached_to,
            full_data,
            offset,
            limit,
            order_by_name,
            timeout,
            attached_only,
        } => {
            let options = ListTagsOptions {
                providers: non_empty(providers),
                attached_to,
                full_data,
                offset,
                limit,
                order_by_name,
                timeout,
                attached_only,
                ..Default::default()
            };
            print(service.list_tags(&options).await?.result);
        }
        Command::DeleteAll { providers } => {
            let options = DeleteTagAllOptions {
                providers,
                ..Default::default()
            };
            print(service.delete_tag_all(&options).await?.result);
        }
        Command::Delete {
            tag_name,
            providers,
        } => {
            let options = DeleteTagOptions {
                providers: non_empty(providers),
                ..Default::default()
            };
            print(service.delete_tag(&tag_name, &options).await?.result);
        }
        Command::Attach(args) => {
            print(service.attach_tag(&args.into_request()?).await?.result);
        }
        Command::Detach(args) => {
            print(service.detach_tag(&args.into_request()?).await?.result);
        }
    }
    Ok(())
}

fn print<T>(result: T)
where
    T: fmt::Display,
{
    println!("{result}");
}
