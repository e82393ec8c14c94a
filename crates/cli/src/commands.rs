use crate::{
    api::OperatorApi,
    args::{SitesCommand, StatusCommand},
    view,
};

pub async fn handle_sites(api: &OperatorApi, json: bool, command: SitesCommand) -> anyhow::Result<()> {
    match command {
        SitesCommand::List { limit, offset } => {
            let page = api.list_sites(limit, offset).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&page)?);
                return Ok(());
            }
            let rows: Vec<Vec<String>> = page.items.iter().map(view::site_row).collect();
            print!("{}", view::render_table(view::SITE_HEADERS, &rows));
            println!("{} of {} site(s)", page.items.len(), page.total);
        }
        SitesCommand::Add { name, url } => {
            let created = api.create_site(&name, &url).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&created)?);
                return Ok(());
            }
            println!("registered site {}", created.site_id);
            println!("secret (shown once): {}", created.secret);
            println!("configure the agent with FLEETGATE_AGENT_SECRET={}", created.secret);
        }
        SitesCommand::Show { id } => {
            let site = api.get_site(id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&site)?);
                return Ok(());
            }
            let rows = vec![view::site_row(&site)];
            print!("{}", view::render_table(view::SITE_HEADERS, &rows));
            if !site.maintenance.is_empty() {
                println!("maintenance title: {}", site.maintenance.title);
            }
        }
        SitesCommand::Remove { id } => {
            api.delete_site(id).await?;
            println!("deregistered site {id}");
        }
    }

    Ok(())
}

pub async fn handle_status(api: &OperatorApi, json: bool, command: StatusCommand) -> anyhow::Result<()> {
    match command {
        StatusCommand::Set { id, status } => {
            let site = api.set_status(id, status).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&site)?);
                return Ok(());
            }
            println!(
                "site \"{}\" confirmed status: {}",
                site.name,
                site.status.as_str()
            );
        }
    }

    Ok(())
}
