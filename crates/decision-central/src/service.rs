//! Request decoding and response encoding around a [`DecisionEngine`].

use feel_literal::{
    EncoderOptions, LiteralDecoder, LiteralEncoder, StringPolicy, Value, WrapMode,
};
use serde_json::Value as JsonValue;

use crate::engine::DecisionEngine;
use crate::error::ServiceError;
use crate::response::DecisionResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceOptions {
    /// Wrap mode for responses to JSON requests.
    pub json_wrap: WrapMode,
    /// Wrap mode for responses to form requests.
    pub form_wrap: WrapMode,
    pub strings: StringPolicy,
    pub zone_suffix: bool,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            json_wrap: WrapMode::Plain,
            form_wrap: WrapMode::Wrapped,
            strings: StringPolicy::Bare,
            zone_suffix: false,
        }
    }
}

impl ServiceOptions {
    fn encoder(&self, wrap: WrapMode) -> LiteralEncoder {
        LiteralEncoder::with_options(EncoderOptions {
            wrap,
            strings: self.strings,
            zone_suffix: self.zone_suffix,
        })
    }
}

/// A ruleset served over the wire.
#[derive(Debug, Clone)]
pub struct DecisionService<E> {
    engine: E,
    decoder: LiteralDecoder,
    options: ServiceOptions,
}

impl<E: DecisionEngine> DecisionService<E> {
    pub fn new(engine: E) -> Self {
        Self::with_options(engine, ServiceOptions::default())
    }

    pub fn with_options(engine: E, options: ServiceOptions) -> Self {
        Self {
            engine,
            decoder: LiteralDecoder::new(),
            options,
        }
    }

    /// Replace the decoder, e.g. to resolve zones from a fixed table.
    pub fn with_decoder(mut self, decoder: LiteralDecoder) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn options(&self) -> ServiceOptions {
        self.options
    }

    /// Decode a JSON request body into input variables, in body order.
    pub fn decode_json(&self, body: &[u8]) -> Result<Vec<(String, Value)>, ServiceError> {
        let JsonValue::Object(members) = serde_json::from_slice::<JsonValue>(body)? else {
            return Err(ServiceError::NotAnObject);
        };
        members
            .iter()
            .map(|(name, wire)| match self.decoder.decode(wire) {
                Ok(value) => Ok((name.clone(), value)),
                Err(source) => Err(ServiceError::Format {
                    variable: name.clone(),
                    source,
                }),
            })
            .collect()
    }

    /// Decode form fields into input variables.
    ///
    /// Names and values are trimmed. A value that parses as a JSON array or
    /// object is decoded as that composite; every other value is decoded as
    /// literal text. A repeated name keeps its first position and its last
    /// value.
    pub fn decode_form<I, K, V>(&self, fields: I) -> Result<Vec<(String, Value)>, ServiceError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut input: Vec<(String, Value)> = Vec::new();
        for (name, text) in fields {
            let name = name.as_ref().trim();
            let value = self
                .decode_field(text.as_ref().trim())
                .map_err(|source| ServiceError::Format {
                    variable: name.to_owned(),
                    source,
                })?;
            match input.iter_mut().find(|(existing, _)| existing == name) {
                Some((_, slot)) => *slot = value,
                None => input.push((name.to_owned(), value)),
            }
        }
        Ok(input)
    }

    fn decode_field(&self, text: &str) -> Result<Value, feel_literal::FormatError> {
        if text.starts_with('[') || text.starts_with('{') {
            if let Ok(composite @ (JsonValue::Array(_) | JsonValue::Object(_))) =
                serde_json::from_str::<JsonValue>(text)
            {
                return self.decoder.decode(&composite);
            }
        }
        self.decoder.decode_str(text)
    }

    /// Handle a JSON request; the response uses [`ServiceOptions::json_wrap`].
    pub fn decide_json(
        &self,
        body: &[u8],
        scope: Option<&str>,
    ) -> Result<DecisionResponse, ServiceError> {
        let input = self.decode_json(body)?;
        Ok(self.respond(&input, scope, self.options.json_wrap))
    }

    /// Handle a form request; the response uses [`ServiceOptions::form_wrap`].
    pub fn decide_form<I, K, V>(
        &self,
        fields: I,
        scope: Option<&str>,
    ) -> Result<DecisionResponse, ServiceError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let input = self.decode_form(fields)?;
        Ok(self.respond(&input, scope, self.options.form_wrap))
    }

    fn respond(
        &self,
        input: &[(String, Value)],
        scope: Option<&str>,
        wrap: WrapMode,
    ) -> DecisionResponse {
        match self.engine.decide(input, scope) {
            Ok(decision) => {
                DecisionResponse::from_decision(&decision, &self.options.encoder(wrap))
            }
            Err(error) => DecisionResponse::from_error(error),
        }
    }
}
