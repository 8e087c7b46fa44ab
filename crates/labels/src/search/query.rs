//! Typed view over search query parameters.

use crate::config::SearchQueryConfig;
use crate::error::{LabelsError, Result};
use crate::selector::{Rule, Selector};

use super::params::QueryParams;

/// Search fields carried in a URL query string.
///
/// `labels` holds a selector. The raw text is only parsed once rules are
/// edited; until then it is passed through untouched. Converting back with
/// [`SearchQuery::to_params`] never mutates the source parameters.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    config: SearchQueryConfig,
    source: QueryParams,
    pub name: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    raw_labels: String,
    rules: Option<Selector>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a query string (`?name=x&labels=...`).
    pub fn parse(query: &str) -> Result<Self> {
        Self::from_params(QueryParams::parse(query))
    }

    pub fn from_params(params: QueryParams) -> Result<Self> {
        Self::with_config(params, SearchQueryConfig::default())
    }

    /// Reads the search fields from `params`.
    ///
    /// The config must name distinct, non-empty parameters. A non-numeric
    /// `page` is an error; a non-numeric `pageSize` is ignored.
    pub fn with_config(params: QueryParams, config: SearchQueryConfig) -> Result<Self> {
        config.validate()?;
        let names = &config.params;

        let name = params
            .get(&names.name)
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        let page = match params.get(&names.page).map(str::trim) {
            Some(raw) if !raw.is_empty() => {
                Some(raw.parse::<u32>().map_err(|_| LabelsError::InvalidParam {
                    name: names.page.clone(),
                    value: raw.to_string(),
                })?)
            }
            _ => None,
        };

        let page_size = match params.get(&names.page_size).map(str::trim) {
            Some(raw) if !raw.is_empty() => match raw.parse::<u32>() {
                Ok(value) => Some(value),
                Err(error) => {
                    log::debug!("ignoring {}={raw:?}: {error}", names.page_size);
                    None
                }
            },
            _ => None,
        };

        let raw_labels = params.get(&names.labels).unwrap_or_default().to_string();

        Ok(Self {
            name,
            page,
            page_size,
            raw_labels,
            rules: None,
            source: params,
            config,
        })
    }

    /// Returns the selector text: the serialized rules once they have been
    /// edited, otherwise the raw parameter value.
    pub fn labels(&self) -> String {
        match &self.rules {
            Some(selector) => selector.to_string(),
            None => self.raw_labels.clone(),
        }
    }

    /// Replaces the selector. An empty value clears it.
    ///
    /// Invalid selector text is logged and the previous rules are kept; use
    /// [`SearchQuery::try_set_labels`] to get the error instead.
    pub fn set_labels(&mut self, value: &str) {
        if let Err(error) = self.try_set_labels(value) {
            log::warn!("failed to parse query labels {value:?} into a selector: {error}");
        }
    }

    pub fn try_set_labels(&mut self, value: &str) -> Result<()> {
        if value.trim().is_empty() {
            self.rules = None;
            self.raw_labels.clear();
            return Ok(());
        }

        let selector = Selector::parse(value)?;
        log::debug!("parsed labels {value:?} into {} rule(s)", selector.len());
        self.rules = Some(selector);
        self.raw_labels = value.to_string();
        Ok(())
    }

    /// Appends a rule, keeping any rules already present for the same key.
    pub fn set_rule(&mut self, rule: Rule) {
        self.selector_mut().push(rule);
    }

    /// Replaces all rules for the rule's key with `rule`.
    pub fn replace_rule_for_key(&mut self, rule: Rule) {
        self.selector_mut().replace_rules_for_key(rule);
    }

    pub fn remove_rules_for_key(&mut self, key: &str) -> usize {
        self.selector_mut().remove_rules_for_key(key)
    }

    /// Returns the current rules as a selector.
    pub fn selector(&self) -> Result<Selector> {
        match &self.rules {
            Some(selector) => Ok(selector.clone()),
            None => Selector::parse(&self.raw_labels),
        }
    }

    /// Builds the parameters for this query: the source parameters with every
    /// search field written back (or removed when unset).
    pub fn to_params(&self) -> QueryParams {
        let names = &self.config.params;
        let mut params = self.source.clone();

        match self.name.as_deref().filter(|name| !name.is_empty()) {
            Some(name) => params.set(names.name.as_str(), name),
            None => params.delete(&names.name),
        }
        match self.page.filter(|page| *page > 0) {
            Some(page) => params.set(names.page.as_str(), page.to_string()),
            None => params.delete(&names.page),
        }
        match self.page_size.filter(|size| *size > 0) {
            Some(size) => params.set(names.page_size.as_str(), size.to_string()),
            None => params.delete(&names.page_size),
        }

        let labels = self.labels();
        if labels.is_empty() {
            params.delete(&names.labels);
        } else {
            log::debug!("setting {} from selector {labels:?}", names.labels);
            params.set(names.labels.as_str(), labels);
        }

        params
    }

    pub fn to_query_string(&self) -> String {
        self.to_params().encode()
    }

    pub fn source(&self) -> &QueryParams {
        &self.source
    }

    fn selector_mut(&mut self) -> &mut Selector {
        if self.rules.is_none() {
            let selector = Selector::parse(&self.raw_labels).unwrap_or_else(|error| {
                log::warn!(
                    "discarding unparsable labels {:?}: {error}",
                    self.raw_labels
                );
                Selector::new()
            });
            self.rules = Some(selector);
        }
        self.rules.get_or_insert_with(Selector::new)
    }
}
