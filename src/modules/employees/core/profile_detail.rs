// A partial update of a user record restricted to the known profile sections.

use crate::modules::employees::core::errors::AccessError;
use crate::shared::core::primitives::Document;
use crate::shared::core::registry::{ProfileSection, enumerated_values};

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileDetailPatch {
    fields: Document,
}

impl ProfileDetailPatch {
    pub fn sections(&self) -> Vec<ProfileSection> {
        self.fields
            .keys()
            .filter_map(|key| key.parse().ok())
            .collect()
    }

    pub fn into_fields(self) -> Document {
        self.fields
    }
}

impl TryFrom<Document> for ProfileDetailPatch {
    type Error = AccessError;

    /// Rejects the whole patch on the first key that is not a profile section.
    fn try_from(fields: Document) -> Result<Self, Self::Error> {
        if let Some(foreign) = fields
            .keys()
            .find(|key| key.parse::<ProfileSection>().is_err())
        {
            return Err(AccessError::DisallowedSection {
                key: foreign.clone(),
                allowed: enumerated_values::<ProfileSection>().join(", "),
            });
        }
        Ok(Self { fields })
    }
}
