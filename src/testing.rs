//! In-memory stand-in for the Checkmk API used by unit tests.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::checkmk::types::*;
use crate::checkmk::{MonitoringApi, UpstreamError};
use crate::config::Config;

pub fn test_config() -> Config {
    Config {
        checkmk_url: "https://cmk.example.com/".to_string(),
        checkmk_site: "prod".to_string(),
        checkmk_username: "automation".to_string(),
        checkmk_password: "secret".to_string(),
        ignore_ssl: false,
        request_timeout_secs: 5,
        listen_addr: "127.0.0.1:0".to_string(),
        frontend_dir: "public".to_string(),
    }
}

#[derive(Default)]
pub struct FakeMonitoring {
    pub folders: Vec<CmkFolder>,
    pub hosts: Vec<CmkHost>,
    pub services: Vec<CmkService>,
    pub sites: Vec<CmkSiteConnection>,
    /// Host name -> (status, body) returned when a downtime is created for it
    pub downtime_failures: HashMap<String, (u16, String)>,
    /// Fail every list call with this (status, body)
    pub list_failure: Option<(u16, String)>,
    pub created: Mutex<Vec<DowntimeCreate>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeMonitoring {
    pub fn with_host(mut self, name: &str, folder: &str, parents: &[&str], offline: bool) -> Self {
        self.hosts.push(CmkHost {
            id: name.to_string(),
            extensions: HostExtensions {
                is_offline: offline,
                folder: folder.to_string(),
                alias: None,
                attributes: ParentAttributes {
                    parents: parents.iter().map(|p| p.to_string()).collect(),
                },
            },
        });
        self
    }

    pub fn with_folder(mut self, id: &str, parents: &[&str]) -> Self {
        self.folders.push(CmkFolder {
            id: id.to_string(),
            extensions: FolderExtensions {
                attributes: ParentAttributes {
                    parents: parents.iter().map(|p| p.to_string()).collect(),
                },
            },
        });
        self
    }

    pub fn failing_downtime(mut self, host: &str, status: u16, body: &str) -> Self {
        self.downtime_failures
            .insert(host.to_string(), (status, body.to_string()));
        self
    }

    pub fn failing_lists(mut self, status: u16, body: &str) -> Self {
        self.list_failure = Some((status, body.to_string()));
        self
    }

    pub fn created_hosts(&self) -> Vec<String> {
        let created = self.created.lock().unwrap();
        created.iter().map(|d| d.host_name.clone()).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record_call(&self, call: String) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        match &self.list_failure {
            Some((status, body)) => Err(UpstreamError::new(*status, body.clone()).into()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MonitoringApi for FakeMonitoring {
    async fn list_folders(&self) -> Result<Vec<CmkFolder>> {
        self.record_call("list_folders".to_string())?;
        Ok(self.folders.clone())
    }

    async fn list_hosts(&self, site: &str) -> Result<Vec<CmkHost>> {
        self.record_call(format!("list_hosts:{}", site))?;
        Ok(self.hosts.clone())
    }

    async fn list_services(&self, host: &str) -> Result<Vec<CmkService>> {
        self.record_call(format!("list_services:{}", host))?;
        Ok(self.services.clone())
    }

    async fn list_site_connections(&self) -> Result<Vec<CmkSiteConnection>> {
        self.record_call("list_site_connections".to_string())?;
        Ok(self.sites.clone())
    }

    async fn create_downtime(&self, downtime: &DowntimeCreate) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("create_downtime:{}", downtime.host_name));
        if let Some((status, body)) = self.downtime_failures.get(&downtime.host_name) {
            return Err(UpstreamError::new(*status, body.clone()).into());
        }
        self.created.lock().unwrap().push(downtime.clone());
        Ok(())
    }
}
