//! Attribute aggregation.

use crate::markup::{AttrValue, RawAttribute};
use crate::token::{Property, PropertySet, StaticValue};
use crate::validate::CompilerError;

/// Lowers one attribute. Source order is kept by the caller; a later
/// attribute or spread overrides an earlier one only at evaluation time.
pub fn lower_attribute<E>(
    attribute: RawAttribute<E>,
    file_path: &str,
) -> Result<Property<E>, CompilerError> {
    match attribute {
        RawAttribute::Spread(spread) => Ok(Property::Spread {
            value: spread.expression,
        }),
        RawAttribute::Named(attr) => {
            let name = attr.name.to_string();
            match attr.value {
                None => Ok(Property::Static {
                    name,
                    value: StaticValue::Bool(true),
                }),
                Some(AttrValue::String(value)) => Ok(Property::Static {
                    name,
                    value: StaticValue::String(value),
                }),
                Some(AttrValue::Expression(value)) => Ok(Property::Dynamic { name, value }),
                Some(AttrValue::Markup(_)) => {
                    Err(CompilerError::static_markup_value(file_path, &attr.location))
                }
            }
        }
    }
}

/// Lowers the whole attribute list, then classifies it. An empty list is the
/// `None` sentinel.
pub fn aggregate<E>(
    attributes: Vec<RawAttribute<E>>,
    file_path: &str,
) -> Result<Option<PropertySet<E>>, CompilerError> {
    let properties = attributes
        .into_iter()
        .map(|attr| lower_attribute(attr, file_path))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(PropertySet::new(properties))
}
