use crate::models::aws::{AwsCredentials, AwsProfileConfig};
use anyhow::Error;
use camino::Utf8Path;
use itertools::Itertools;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::{fs, io};

pub(crate) static PROFILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\[\s*(.+?)\s*\]\s*$").unwrap());

pub(crate) static REGION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*region\s*=\s*(\S+)\s*$").unwrap());

fn is_comment(line: &str) -> bool {
    line.starts_with('#') || line.starts_with(';')
}

fn section_header(line: &str) -> Option<&str> {
    PROFILE_RE
        .captures(line)
        .and_then(|captures| captures.get(1))
        .map(|header| header.as_str().trim())
}

/// Groups the non-comment lines of an ini style file under their `[header]`.
/// Lines before the first header and sections with a blank header are dropped.
fn sections(contents: &str) -> Vec<(&str, Vec<&str>)> {
    let mut sections: Vec<(&str, Vec<&str>)> = Vec::new();
    for line in contents.lines().map(str::trim) {
        if line.is_empty() || is_comment(line) {
            continue;
        }
        if let Some(header) = section_header(line) {
            sections.push((header, Vec::new()));
        } else if let Some((_, lines)) = sections.last_mut() {
            lines.push(line);
        }
    }
    sections.retain(|(header, _)| !header.is_empty());
    sections
}

pub fn parse_credentials(contents: &str) -> Vec<AwsCredentials> {
    sections(contents)
        .into_iter()
        .map(|(profile, lines)| {
            let mut creds = AwsCredentials {
                profile: profile.to_string(),
                ..Default::default()
            };
            for line in lines {
                if let Some((key, value)) = line.split_once('=') {
                    match key.trim() {
                        "aws_access_key_id" => creds.access_key_id = Some(value.trim().into()),
                        "aws_secret_access_key" => {
                            creds.secret_access_key = Some(value.trim().into())
                        }
                        _ => {}
                    }
                }
            }
            creds
        })
        .collect()
}

// Config file headers are `[default]` or `[profile name]`; `[sso-session ..]`
// and `[services ..]` sections are not profiles.
fn config_profile_name(header: &str) -> Option<&str> {
    if header == "default" {
        return Some(header);
    }
    header
        .strip_prefix("profile")
        .filter(|rest| rest.starts_with(char::is_whitespace))
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

pub fn parse_config(contents: &str) -> Vec<AwsProfileConfig> {
    sections(contents)
        .into_iter()
        .filter_map(|(header, lines)| {
            let name = config_profile_name(header)?;
            let region = lines.iter().find_map(|line| {
                REGION_RE
                    .captures(line)
                    .and_then(|captures| captures.get(1))
                    .map(|region| region.as_str().to_string())
            });
            Some(AwsProfileConfig {
                name: name.to_string(),
                region,
            })
        })
        .collect()
}

/// Reads a file that is allowed to be absent.
fn read_optional(path: &Utf8Path) -> Result<Option<String>, Error> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!("{} does not exist", path);
            Ok(None)
        }
        Err(err) => Err(Error::msg(format!(
            "unable to open AWS creds file {}: {}",
            path, err
        ))),
    }
}

/// Profile names from the credentials file followed by any extra profiles
/// defined only in the config file.
pub fn list_profiles(
    credentials_file: &Utf8Path,
    config_file: &Utf8Path,
) -> Result<Vec<String>, Error> {
    let credentials = read_optional(credentials_file)?;
    let config = read_optional(config_file)?;
    if credentials.is_none() && config.is_none() {
        return Err(Error::msg(format!(
            "unable to open AWS creds file {}: no credentials or config file found",
            credentials_file
        )));
    }

    let from_credentials = credentials
        .as_deref()
        .map(parse_credentials)
        .unwrap_or_default()
        .into_iter()
        .map(|creds| {
            debug!("aws: {:?}", creds);
            creds.profile
        });
    let from_config = config
        .as_deref()
        .map(parse_config)
        .unwrap_or_default()
        .into_iter()
        .map(|profile| profile.name);

    Ok(from_credentials.chain(from_config).unique().collect())
}

pub fn configured_region(config_file: &Utf8Path, profile: &str) -> Result<Option<String>, Error> {
    Ok(read_optional(config_file)?.and_then(|contents| {
        parse_config(&contents)
            .into_iter()
            .find(|config| config.name == profile)
            .and_then(|config| config.region)
    }))
}
