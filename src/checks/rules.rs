//! The subject × aspect rule table.
//!
//! Most schema-level rule ids are composed from a [`Subject`] (where in the
//! API the change sits) and an [`Aspect`] (what kind of change it is). The
//! default level comes from the aspect's polarity: one level when the
//! change is on the request side, another on the response side. Read-only
//! request properties and write-only response properties are never sent in
//! that direction, so their rules default to INFO.

use crate::changes::Level;
use std::fmt;

/// Which way data flows through the changed element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Request,
    Response,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    RequestParameter,
    RequestBody,
    RequestProperty,
    RequestReadOnlyProperty,
    ResponseBody,
    ResponseProperty,
    ResponseWriteOnlyProperty,
    ResponseHeader,
}

impl Subject {
    pub const ALL: [Self; 8] = [
        Self::RequestParameter,
        Self::RequestBody,
        Self::RequestProperty,
        Self::RequestReadOnlyProperty,
        Self::ResponseBody,
        Self::ResponseProperty,
        Self::ResponseWriteOnlyProperty,
        Self::ResponseHeader,
    ];

    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::RequestParameter => "request-parameter",
            Self::RequestBody => "request-body",
            Self::RequestProperty => "request-property",
            Self::RequestReadOnlyProperty => "request-read-only-property",
            Self::ResponseBody => "response-body",
            Self::ResponseProperty => "response-property",
            Self::ResponseWriteOnlyProperty => "response-write-only-property",
            Self::ResponseHeader => "response-header",
        }
    }

    #[must_use]
    pub const fn channel(self) -> Channel {
        match self {
            Self::RequestParameter
            | Self::RequestBody
            | Self::RequestProperty
            | Self::RequestReadOnlyProperty => Channel::Request,
            Self::ResponseBody
            | Self::ResponseProperty
            | Self::ResponseWriteOnlyProperty
            | Self::ResponseHeader => Channel::Response,
        }
    }

    /// Read-only request and write-only response properties.
    #[must_use]
    pub const fn is_unused_direction(self) -> bool {
        matches!(
            self,
            Self::RequestReadOnlyProperty | Self::ResponseWriteOnlyProperty
        )
    }

    /// Property subject for a nested node on `channel`.
    #[must_use]
    pub const fn property(channel: Channel, read_only: bool, write_only: bool) -> Self {
        match channel {
            Channel::Request if read_only => Self::RequestReadOnlyProperty,
            Channel::Request => Self::RequestProperty,
            Channel::Response if write_only => Self::ResponseWriteOnlyProperty,
            Channel::Response => Self::ResponseProperty,
        }
    }

    /// Aspects that compose a rule id with this subject.
    #[must_use]
    pub fn aspects(self) -> Vec<Aspect> {
        let schema = Aspect::SCHEMA.iter().copied().filter(move |aspect| match self.channel() {
            Channel::Request => *aspect != Aspect::TypeSpecialized,
            Channel::Response => *aspect != Aspect::TypeGeneralized,
        });
        match self {
            Self::RequestBody | Self::ResponseBody => schema.collect(),
            Self::ResponseHeader => Aspect::PRESENCE.to_vec(),
            _ => schema.chain(Aspect::PRESENCE.iter().copied()).collect(),
        }
    }

    #[must_use]
    pub fn rule_id(self, aspect: Aspect) -> String {
        format!("{}-{}", self.prefix(), aspect.slug())
    }

    #[must_use]
    pub const fn default_level(self, aspect: Aspect) -> Level {
        if self.is_unused_direction() {
            return Level::Info;
        }
        let (request, response) = aspect.polarity();
        match self.channel() {
            Channel::Request => request,
            Channel::Response => response,
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

macro_rules! aspects {
    ($($variant:ident => $slug:literal, ($req:ident, $resp:ident);)*) => {
        /// Kind of change, independent of where it happened.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Aspect {
            $($variant,)*
        }

        impl Aspect {
            #[must_use]
            pub const fn slug(self) -> &'static str {
                match self {
                    $(Self::$variant => $slug,)*
                }
            }

            /// Default levels as `(request, response)`.
            #[must_use]
            pub const fn polarity(self) -> (Level, Level) {
                match self {
                    $(Self::$variant => (Level::$req, Level::$resp),)*
                }
            }
        }
    };
}

aspects! {
    MaxIncreased => "max-increased", (Info, Err);
    MaxDecreased => "max-decreased", (Err, Info);
    MinIncreased => "min-increased", (Err, Info);
    MinDecreased => "min-decreased", (Info, Err);
    MaxLengthIncreased => "max-length-increased", (Info, Err);
    MaxLengthDecreased => "max-length-decreased", (Err, Info);
    MinLengthIncreased => "min-length-increased", (Err, Info);
    MinLengthDecreased => "min-length-decreased", (Info, Err);
    MaxItemsIncreased => "max-items-increased", (Info, Err);
    MaxItemsDecreased => "max-items-decreased", (Err, Info);
    MinItemsIncreased => "min-items-increased", (Err, Info);
    MinItemsDecreased => "min-items-decreased", (Info, Err);
    PatternAdded => "pattern-added", (Err, Info);
    PatternRemoved => "pattern-removed", (Info, Warn);
    PatternChanged => "pattern-changed", (Warn, Warn);
    EnumValueAdded => "enum-value-added", (Info, Warn);
    EnumValueRemoved => "enum-value-removed", (Err, Warn);
    BecameEnum => "became-enum", (Err, Info);
    DefaultValueAdded => "default-value-added", (Info, Info);
    DefaultValueRemoved => "default-value-removed", (Info, Info);
    DefaultValueChanged => "default-value-changed", (Info, Info);
    TypeChanged => "type-changed", (Err, Err);
    TypeGeneralized => "type-generalized", (Info, Info);
    TypeSpecialized => "type-specialized", (Info, Info);
    ListOfTypesWidened => "list-of-types-widened", (Info, Err);
    ListOfTypesNarrowed => "list-of-types-narrowed", (Err, Info);
    BecameNullable => "became-nullable", (Info, Err);
    BecameNotNullable => "became-not-nullable", (Err, Info);
    OneOfAdded => "one-of-added", (Info, Warn);
    OneOfRemoved => "one-of-removed", (Err, Info);
    AnyOfAdded => "any-of-added", (Info, Warn);
    AnyOfRemoved => "any-of-removed", (Err, Info);
    AllOfAdded => "all-of-added", (Err, Info);
    AllOfRemoved => "all-of-removed", (Warn, Warn);
    DiscriminatorAdded => "discriminator-added", (Info, Info);
    DiscriminatorRemoved => "discriminator-removed", (Info, Info);
    DiscriminatorPropertyNameChanged => "discriminator-property-name-changed", (Warn, Warn);
    DiscriminatorMappingAdded => "discriminator-mapping-added", (Info, Warn);
    DiscriminatorMappingDeleted => "discriminator-mapping-deleted", (Err, Info);
    DiscriminatorMappingChanged => "discriminator-mapping-changed", (Warn, Warn);
    AddedRequired => "added-required", (Err, Info);
    AddedOptional => "added-optional", (Info, Info);
    RemovedRequired => "removed-required", (Warn, Err);
    RemovedOptional => "removed-optional", (Warn, Warn);
    BecameRequired => "became-required", (Err, Info);
    BecameOptional => "became-optional", (Info, Err);
}

impl Aspect {
    /// Aspects describing a change to a schema node.
    pub const SCHEMA: &'static [Self] = &[
        Self::MaxIncreased,
        Self::MaxDecreased,
        Self::MinIncreased,
        Self::MinDecreased,
        Self::MaxLengthIncreased,
        Self::MaxLengthDecreased,
        Self::MinLengthIncreased,
        Self::MinLengthDecreased,
        Self::MaxItemsIncreased,
        Self::MaxItemsDecreased,
        Self::MinItemsIncreased,
        Self::MinItemsDecreased,
        Self::PatternAdded,
        Self::PatternRemoved,
        Self::PatternChanged,
        Self::EnumValueAdded,
        Self::EnumValueRemoved,
        Self::BecameEnum,
        Self::DefaultValueAdded,
        Self::DefaultValueRemoved,
        Self::DefaultValueChanged,
        Self::TypeChanged,
        Self::TypeGeneralized,
        Self::TypeSpecialized,
        Self::ListOfTypesWidened,
        Self::ListOfTypesNarrowed,
        Self::BecameNullable,
        Self::BecameNotNullable,
        Self::OneOfAdded,
        Self::OneOfRemoved,
        Self::AnyOfAdded,
        Self::AnyOfRemoved,
        Self::AllOfAdded,
        Self::AllOfRemoved,
        Self::DiscriminatorAdded,
        Self::DiscriminatorRemoved,
        Self::DiscriminatorPropertyNameChanged,
        Self::DiscriminatorMappingAdded,
        Self::DiscriminatorMappingDeleted,
        Self::DiscriminatorMappingChanged,
    ];

    /// Aspects describing an element appearing, disappearing or changing
    /// whether it is required.
    pub const PRESENCE: &'static [Self] = &[
        Self::AddedRequired,
        Self::AddedOptional,
        Self::RemovedRequired,
        Self::RemovedOptional,
        Self::BecameRequired,
        Self::BecameOptional,
    ];
}
