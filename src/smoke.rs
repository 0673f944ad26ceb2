//! Smoke test against a live Cachet installation
//!
//! Creates, updates and deletes throwaway resources and checks that the
//! server echoes what was sent. Meant to be run against a disposable
//! instance (a local docker setup is enough).

use anyhow::{ensure, Context, Result};
use cachet_client::enums::*;
use cachet_client::{
    Client, ComponentUpdate, NewComponent, NewComponentGroup, NewIncident, NewMetric,
};
use futures::TryStreamExt;
use std::collections::BTreeSet;

pub async fn run(client: &Client) -> Result<()> {
    ping(client).await.context("ping")?;
    version(client).await.context("version")?;
    components(client).await.context("components")?;
    component_groups(client).await.context("component groups")?;
    subscribers(client).await.context("subscribers")?;
    incidents(client).await.context("incidents")?;
    metrics(client).await.context("metrics")?;
    println!("All checks passed");
    Ok(())
}

async fn ping(client: &Client) -> Result<()> {
    ensure!(client.ping().await?, "ping did not answer Pong!");
    Ok(())
}

async fn version(client: &Client) -> Result<()> {
    let version = client.version().await?;
    ensure!(
        version.value.len() >= 3,
        "suspicious version string '{}'",
        version.value
    );
    println!("Version   : {}", version.value);
    println!("on_latest : {}", version.on_latest);
    Ok(())
}

async fn components(client: &Client) -> Result<()> {
    let comp = client
        .components
        .create(
            NewComponent::new("Test Component", COMPONENT_STATUS_OPERATIONAL)
                .description("This is a test")
                .tags(["test", "thing"])
                .order(1),
        )
        .await?;
    ensure!(comp.status() == Some(COMPONENT_STATUS_OPERATIONAL), "status not stored");
    ensure!(comp.created_at().is_some(), "created_at is not a timestamp");
    ensure!(comp.updated_at().is_some(), "updated_at is not a timestamp");

    let mut comp = comp;
    comp.set_name("Test Thing");
    comp.set_status(COMPONENT_STATUS_MAJOR_OUTAGE);
    comp.set_link("http://status.example.com");
    comp.set_order(10);
    comp.set_enabled(false);
    comp.set_tags(["moo", "boo"]);
    let comp = comp.update().await?;

    ensure!(comp.name() == Some("Test Thing"), "name not updated");
    ensure!(comp.description() == Some("This is a test"), "description lost");
    ensure!(comp.status() == Some(COMPONENT_STATUS_MAJOR_OUTAGE), "status not updated");
    ensure!(comp.link() == Some("http://status.example.com"), "link not updated");
    ensure!(comp.order() == Some(10), "order not updated");
    ensure!(!comp.enabled(), "enabled flag not updated");
    ensure!(
        comp.tags() == BTreeSet::from(["moo".to_string(), "boo".to_string()]),
        "tags not updated"
    );

    let comp = client
        .components
        .update(
            comp.id(),
            ComponentUpdate {
                status: Some(COMPONENT_STATUS_OPERATIONAL),
                name: Some("A new component name".to_string()),
                ..Default::default()
            },
        )
        .await?;
    ensure!(comp.name() == Some("A new component name"), "manager update failed");
    ensure!(comp.link() == Some("http://status.example.com"), "partial update dropped link");

    let fetched = client.components.get(comp.id()).await?;
    ensure!(fetched == comp, "refetch returned another component");

    comp.delete().await?;
    match client.components.get(comp.id()).await {
        Err(e) if e.is_not_found() => Ok(()),
        Err(e) => Err(e.into()),
        Ok(_) => anyhow::bail!("component still exists after delete"),
    }
}

async fn component_groups(client: &Client) -> Result<()> {
    let grp = client
        .component_groups
        .create(NewComponentGroup::new("Test Group").order(1))
        .await?;
    ensure!(grp.id() > 0, "group has no id");
    ensure!(grp.name() == Some("Test Group"), "name not stored");
    ensure!(grp.order() == 1, "order not stored");
    ensure!(!grp.is_collapsed() && grp.is_open(), "new group should be open");
    ensure!(grp.is_operational(), "empty group should be operational");

    let mut grp = client.component_groups.get(grp.id()).await?;
    grp.set_order(2);
    grp.set_name("Global Services");
    grp.set_collapsed(COMPONENT_GROUP_COLLAPSED_TRUE);
    let grp = grp.update().await?;
    ensure!(grp.name() == Some("Global Services"), "name not updated");
    ensure!(grp.order() == 2, "order not updated");
    ensure!(grp.is_collapsed() && !grp.is_open(), "collapse not updated");

    grp.delete().await?;
    Ok(())
}

async fn subscribers(client: &Client) -> Result<()> {
    let sub = client
        .subscribers
        .create("smoke-test@example.com", None, true)
        .await?;
    ensure!(sub.created_at().is_some(), "created_at is not a timestamp");
    ensure!(sub.verified_at().is_some(), "verified subscriber has no verified_at");

    let count = client.subscribers.count().await?;
    ensure!(count > 0, "subscriber count is 0");

    let listed: Vec<_> = client.subscribers.list(1, 20).try_collect().await?;
    ensure!(
        listed.len() as u64 == count,
        "listed {} subscribers, count says {}",
        listed.len(),
        count
    );

    sub.delete().await?;
    let after = client.subscribers.count().await?;
    ensure!(count == after + 1, "subscriber count {} != {}", count, after + 1);
    Ok(())
}

async fn incidents(client: &Client) -> Result<()> {
    let issue = client
        .incidents
        .create(
            NewIncident::new(
                "Something blew up!",
                "We are looking into it",
                INCIDENT_INVESTIGATING,
            )
            .visible(true),
        )
        .await?;
    ensure!(issue.visible(), "visible flag not stored");

    let update = client
        .incident_updates()
        .create(issue.id(), INCIDENT_IDENTIFIED, "Found the cause")
        .await?;
    let updates: Vec<_> = issue.updates().try_collect().await?;
    ensure!(updates.contains(&update), "incident update not listed");

    update.delete().await?;
    issue.delete().await?;
    Ok(())
}

async fn metrics(client: &Client) -> Result<()> {
    let metric = client
        .metrics
        .create(NewMetric::new("Smoke latency", "ms", "Smoke test metric", 0.0))
        .await?;
    ensure!(metric.display_chart(), "display_chart not stored");

    let point = client.metric_points().create(metric.id(), 42.0, None).await?;
    let points: Vec<_> = metric.points().try_collect().await?;
    ensure!(points.contains(&point), "metric point not listed");

    point.delete().await?;
    metric.delete().await?;
    Ok(())
}
