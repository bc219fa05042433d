use aws_sdk_ec2::{
    Client as Ec2Client,
    error::ProvideErrorMetadata,
    types::{Filter, Instance},
};
use shotty_core::{
    cloud_provider::{InstanceInfo, InstanceState, PROJECT_TAG},
    error::Result,
};
use tracing::debug;

use crate::aws_error::{INSTANCE_NOT_FOUND, map_aws_error};

pub(super) async fn list_instances(
    ec2_client: &Ec2Client,
    project: Option<&str>,
) -> Result<Vec<InstanceInfo>> {
    let mut request = ec2_client.describe_instances();
    if let Some(project) = project {
        request = request.filters(
            Filter::builder()
                .name(format!("tag:{PROJECT_TAG}"))
                .values(project)
                .build(),
        );
    }

    let pages = request
        .into_paginator()
        .send()
        .try_collect()
        .await
        .map_err(|error| map_aws_error("DescribeInstances", error))?;

    let instances: Vec<InstanceInfo> = pages
        .iter()
        .flat_map(|page| page.reservations())
        .flat_map(|reservation| reservation.instances())
        .filter_map(instance_info)
        .collect();
    debug!(count = instances.len(), project, "described instances");
    Ok(instances)
}

pub(super) async fn instance_state(
    ec2_client: &Ec2Client,
    instance_id: &str,
) -> Result<Option<InstanceState>> {
    let resp = match ec2_client
        .describe_instances()
        .instance_ids(instance_id)
        .send()
        .await
    {
        Ok(resp) => resp,
        Err(error)
            if error
                .as_service_error()
                .and_then(|service_error| service_error.code())
                == Some(INSTANCE_NOT_FOUND) =>
        {
            return Ok(None);
        }
        Err(error) => return Err(map_aws_error("DescribeInstances", error)),
    };

    Ok(resp
        .reservations()
        .iter()
        .flat_map(|reservation| reservation.instances())
        .find(|instance| instance.instance_id() == Some(instance_id))
        .map(state_of))
}

pub(super) async fn start_instance(ec2_client: &Ec2Client, instance_id: &str) -> Result<()> {
    ec2_client
        .start_instances()
        .instance_ids(instance_id)
        .send()
        .await
        .map_err(|error| map_aws_error("StartInstances", error))?;
    debug!(instance_id, "start requested");
    Ok(())
}

pub(super) async fn stop_instance(ec2_client: &Ec2Client, instance_id: &str) -> Result<()> {
    ec2_client
        .stop_instances()
        .instance_ids(instance_id)
        .send()
        .await
        .map_err(|error| map_aws_error("StopInstances", error))?;
    debug!(instance_id, "stop requested");
    Ok(())
}

fn state_of(instance: &Instance) -> InstanceState {
    instance
        .state()
        .and_then(|state| state.name())
        .map(|name| InstanceState::from_name(name.as_str()))
        .unwrap_or_else(|| InstanceState::Unknown("unknown".to_string()))
}

pub(crate) fn instance_info(instance: &Instance) -> Option<InstanceInfo> {
    let id = instance.instance_id()?.to_string();

    let tags = instance
        .tags()
        .iter()
        .filter_map(|tag| Some((tag.key()?.to_string(), tag.value()?.to_string())))
        .collect();

    Some(InstanceInfo {
        id,
        instance_type: instance
            .instance_type()
            .map(|instance_type| instance_type.as_str().to_string())
            .unwrap_or_default(),
        availability_zone: instance
            .placement()
            .and_then(|placement| placement.availability_zone())
            .unwrap_or_default()
            .to_string(),
        state: state_of(instance),
        public_dns_name: instance.public_dns_name().unwrap_or_default().to_string(),
        tags,
    })
}

#[cfg(test)]
mod tests {
    use aws_sdk_ec2::types::{
        InstanceState as Ec2InstanceState, InstanceStateName, InstanceType, Placement, Tag,
    };

    use super::*;

    #[test]
    fn converts_described_instance() {
        let instance = Instance::builder()
            .instance_id("i-0abc")
            .instance_type(InstanceType::T3Micro)
            .placement(Placement::builder().availability_zone("us-east-1b").build())
            .state(
                Ec2InstanceState::builder()
                    .name(InstanceStateName::Stopped)
                    .build(),
            )
            .public_dns_name("ec2-1-2-3-4.compute-1.amazonaws.com")
            .tags(Tag::builder().key("Project").value("web").build())
            .tags(Tag::builder().key("Name").value("frontend").build())
            .build();

        let info = instance_info(&instance).unwrap();

        assert_eq!(info.id, "i-0abc");
        assert_eq!(info.instance_type, "t3.micro");
        assert_eq!(info.availability_zone, "us-east-1b");
        assert_eq!(info.state, InstanceState::Stopped);
        assert_eq!(info.project(), Some("web"));
        assert_eq!(info.tags.get("Name").map(String::as_str), Some("frontend"));
    }

    #[test]
    fn instance_without_id_is_skipped() {
        assert!(instance_info(&Instance::builder().build()).is_none());
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let info = instance_info(&Instance::builder().instance_id("i-1").build()).unwrap();

        assert_eq!(info.public_dns_name, "");
        assert_eq!(info.project(), None);
        assert_eq!(info.state, InstanceState::Unknown("unknown".to_string()));
    }
}
