//! Builder for the CMS REST `where` syntax.
//!
//! The CMS reads nested query keys such as `where[status][equals]=ACTIVE`
//! and `where[or][0][title][contains]=rust`. Top-level conditions are ANDed
//! together; the `or` group is ANDed with them as a single clause.

use url::form_urlencoded;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equals,
    Contains,
    GreaterThanEqual,
    LessThanEqual,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::Contains => "contains",
            Operator::GreaterThanEqual => "greater_than_equal",
            Operator::LessThanEqual => "less_than_equal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub field: String,
    pub op: Operator,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CmsQuery {
    pub and: Vec<Condition>,
    pub or: Vec<Condition>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub depth: Option<u32>,
    pub sort: Option<String>,
}

impl CmsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, field: impl Into<String>, op: Operator, value: impl Into<String>) -> Self {
        self.and.push(Condition {
            field: field.into(),
            op,
            value: value.into(),
        });
        self
    }

    pub fn any_of(mut self, field: impl Into<String>, op: Operator, value: impl Into<String>) -> Self {
        self.or.push(Condition {
            field: field.into(),
            op,
            value: value.into(),
        });
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn depth(mut self, depth: u32) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Flattens the query into ordered key/value pairs, unencoded.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.and.len() + self.or.len() + 4);

        for c in &self.and {
            pairs.push((
                format!("where[{}][{}]", c.field, c.op.as_str()),
                c.value.clone(),
            ));
        }
        for (i, c) in self.or.iter().enumerate() {
            pairs.push((
                format!("where[or][{i}][{}][{}]", c.field, c.op.as_str()),
                c.value.clone(),
            ));
        }

        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(depth) = self.depth {
            pairs.push(("depth".to_string(), depth.to_string()));
        }
        if let Some(sort) = &self.sort {
            pairs.push(("sort".to_string(), sort.clone()));
        }
        pairs
    }

    /// Form-encoded query string, ready to append after `?`.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.to_pairs())
            .finish()
    }
}
