use std::fmt;

/// Composite identifier for one managed VM: cluster node, numeric id, and
/// display name, carried on the wire as `node|vmid|name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetId {
    pub node: String,
    pub vmid: String,
    pub name: String,
}

impl TargetId {
    pub fn new(
        node: impl Into<String>,
        vmid: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            node: node.into(),
            vmid: vmid.into(),
            name: name.into(),
        }
    }

    /// Parses the composite form value. The name component may be absent in
    /// older payloads; the vmid stands in for display then.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split('|');
        let node = parts.next()?.trim();
        let vmid = parts.next()?.trim();
        if node.is_empty() || vmid.is_empty() {
            return None;
        }
        let name = parts.next().map(str::trim).filter(|n| !n.is_empty());
        Some(Self {
            node: node.to_owned(),
            vmid: vmid.to_owned(),
            name: name.unwrap_or(vmid).to_owned(),
        })
    }

    /// The value submitted with the bulk form.
    pub fn form_value(&self) -> String {
        format!("{}|{}|{}", self.node, self.vmid, self.name)
    }

    /// The short label shown in confirmation previews.
    pub fn label(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.node, self.vmid, self.name)
    }
}
