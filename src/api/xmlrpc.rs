//! XML-RPC wire format: serializing a method call and parsing the `<methodResponse>` that comes back.
//!
//! Only what the registrar needs is supported: every call has a single `<struct>` parameter, and every response has a
//! single value (or a `<fault>`).

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::Event;

use super::error::TransportError;
use super::value::{Struct, Value, parse_timestamp};

/// Format used when sending `<dateTime.iso8601>` values.
const DATETIME_FMT: &str = "%Y%m%dT%H:%M:%S";

/// Serializes a call to `method` with `params` as its only parameter.
///
/// Fails only for values XML-RPC cannot represent: NaN and infinite doubles.
pub fn encode_call(method: &str, params: &Struct) -> Result<String, TransportError> {
    let mut out = String::with_capacity(256);
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    out.push_str("<methodCall><methodName>");
    out.push_str(&escape(method));
    out.push_str("</methodName><params><param><value>");
    write_struct(&mut out, params)?;
    out.push_str("</value></param></params></methodCall>");
    Ok(out)
}

fn write_struct(out: &mut String, fields: &Struct) -> Result<(), TransportError> {
    out.push_str("<struct>");
    for (name, value) in fields {
        out.push_str("<member><name>");
        out.push_str(&escape(name.as_str()));
        out.push_str("</name>");
        write_value(out, value).map_err(|e| match e {
            TransportError::Unencodable(what) => TransportError::Unencodable(format!("`{name}`: {what}")),
            other => other,
        })?;
        out.push_str("</member>");
    }
    out.push_str("</struct>");
    Ok(())
}

fn write_value(out: &mut String, value: &Value) -> Result<(), TransportError> {
    out.push_str("<value>");
    match value {
        // `<int>` is only 32 bits wide; larger values need the `<i8>` extension.
        Value::Int(i) if i32::try_from(*i).is_ok() => {
            out.push_str("<int>");
            out.push_str(&i.to_string());
            out.push_str("</int>");
        },
        Value::Int(i) => {
            out.push_str("<i8>");
            out.push_str(&i.to_string());
            out.push_str("</i8>");
        },
        Value::Bool(b) => out.push_str(if *b { "<boolean>1</boolean>" } else { "<boolean>0</boolean>" }),
        Value::String(s) => {
            out.push_str("<string>");
            out.push_str(&escape(s.as_str()));
            out.push_str("</string>");
        },
        Value::Double(d) if !d.is_finite() => {
            return Err(TransportError::Unencodable(format!("{d} is not a valid <double>")));
        },
        Value::Double(d) => {
            out.push_str("<double>");
            out.push_str(&d.to_string());
            out.push_str("</double>");
        },
        Value::DateTime(dt) => {
            out.push_str("<dateTime.iso8601>");
            out.push_str(&dt.format(DATETIME_FMT).to_string());
            out.push_str("</dateTime.iso8601>");
        },
        Value::Base64(bytes) => {
            out.push_str("<base64>");
            out.push_str(&BASE64.encode(bytes));
            out.push_str("</base64>");
        },
        Value::Array(items) => {
            out.push_str("<array><data>");
            for item in items {
                write_value(out, item)?;
            }
            out.push_str("</data></array>");
        },
        Value::Struct(fields) => write_struct(out, fields)?,
        Value::Nil => out.push_str("<nil/>"),
    }
    out.push_str("</value>");
    Ok(())
}

/// Parses a `<methodResponse>` document.
///
/// A `<fault>` response is returned as [`TransportError::Fault`]; anything that is not well-formed XML-RPC is
/// [`TransportError::Malformed`].
pub fn decode_response(xml: &str) -> Result<Value, TransportError> {
    let mut parser = Parser::new(xml);
    parser.expect_start("methodResponse")?;

    let value = match parser.next()? {
        Token::Start(tag) if tag == "params" => {
            parser.expect_start("param")?;
            let value = parser.value()?;
            parser.expect_end("param")?;
            parser.expect_end("params")?;
            value
        },
        Token::Start(tag) if tag == "fault" => {
            let fault = parser.value()?;
            parser.expect_end("fault")?;
            return Err(fault_error(&fault));
        },
        other => return Err(unexpected(&other, "<params> or <fault>")),
    };

    parser.expect_end("methodResponse")?;
    match parser.next()? {
        Token::Eof => Ok(value),
        other => Err(unexpected(&other, "end of document")),
    }
}

fn fault_error(fault: &Value) -> TransportError {
    let Value::Struct(fields) = fault else {
        return TransportError::Malformed(format!("fault is a {}, not a struct", fault.kind()));
    };

    let code = match fields.get("faultCode") {
        Some(Value::Int(code)) => *code,
        _ => 0,
    };
    let message = match fields.get("faultString") {
        Some(Value::String(msg)) => msg.clone(),
        _ => String::new(),
    };

    TransportError::Fault { code, message }
}

fn unexpected(token: &Token, wanted: &str) -> TransportError {
    TransportError::Malformed(format!("expected {wanted}, found {token}"))
}

/// A simplified view of the XML event stream: just enough to walk XML-RPC documents.
#[derive(Debug, PartialEq)]
enum Token {
    Start(String),
    End(String),
    Empty(String),
    Text(String),
    Eof,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Start(tag) => write!(f, "<{tag}>"),
            Token::End(tag) => write!(f, "</{tag}>"),
            Token::Empty(tag) => write!(f, "<{tag}/>"),
            Token::Text(text) => write!(f, "text {text:?}"),
            Token::Eof => f.write_str("end of document"),
        }
    }
}

struct Parser<'a> {
    reader: Reader<&'a [u8]>,
}

impl<'a> Parser<'a> {
    fn new(xml: &'a str) -> Self {
        Self {
            reader: Reader::from_str(xml),
        }
    }

    /// The next token, including whitespace-only text.
    fn raw(&mut self) -> Result<Token, TransportError> {
        loop {
            let event = self
                .reader
                .read_event()
                .map_err(|e| TransportError::Malformed(e.to_string()))?;

            let token = match event {
                Event::Start(e) => Token::Start(String::from_utf8_lossy(e.name().as_ref()).into_owned()),
                Event::End(e) => Token::End(String::from_utf8_lossy(e.name().as_ref()).into_owned()),
                Event::Empty(e) => Token::Empty(String::from_utf8_lossy(e.name().as_ref()).into_owned()),
                Event::Text(e) => {
                    let text = e.unescape().map_err(|e| TransportError::Malformed(e.to_string()))?;
                    Token::Text(text.into_owned())
                },
                Event::CData(e) => Token::Text(String::from_utf8_lossy(&e).into_owned()),
                Event::Eof => Token::Eof,
                // Declarations, comments, processing instructions, doctypes.
                _ => continue,
            };

            return Ok(token);
        }
    }

    /// The next token, skipping whitespace between elements.
    fn next(&mut self) -> Result<Token, TransportError> {
        loop {
            match self.raw()? {
                Token::Text(text) if text.trim().is_empty() => continue,
                token => return Ok(token),
            }
        }
    }

    /// Concatenates consecutive text (and CDATA) tokens, returning the text and the first non-text token after it.
    fn text(&mut self) -> Result<(String, Token), TransportError> {
        let mut text = String::new();
        loop {
            match self.raw()? {
                Token::Text(t) => text.push_str(&t),
                token => return Ok((text, token)),
            }
        }
    }

    fn expect_start(&mut self, tag: &str) -> Result<(), TransportError> {
        match self.next()? {
            Token::Start(t) if t == tag => Ok(()),
            other => Err(unexpected(&other, &format!("<{tag}>"))),
        }
    }

    fn expect_end(&mut self, tag: &str) -> Result<(), TransportError> {
        match self.next()? {
            Token::End(t) if t == tag => Ok(()),
            other => Err(unexpected(&other, &format!("</{tag}>"))),
        }
    }

    /// Reads a complete `<value>` element (or an empty `<value/>`).
    fn value(&mut self) -> Result<Value, TransportError> {
        match self.next()? {
            Token::Start(t) if t == "value" => self.value_body(),
            Token::Empty(t) if t == "value" => Ok(Value::String(String::new())),
            other => Err(unexpected(&other, "<value>")),
        }
    }

    /// Reads the contents of a `<value>` whose start tag has already been consumed, up to and including `</value>`.
    fn value_body(&mut self) -> Result<Value, TransportError> {
        let (text, token) = self.text()?;
        let value = match token {
            // `<value>text</value>` without a type tag is a string.
            Token::End(t) if t == "value" => return Ok(Value::String(text)),
            Token::Start(tag) if text.trim().is_empty() => self.typed(&tag)?,
            Token::Empty(tag) if text.trim().is_empty() => empty_typed(&tag)?,
            other => return Err(unexpected(&other, "a typed value")),
        };
        self.expect_end("value")?;
        Ok(value)
    }

    /// Reads a typed element whose start tag `tag` has already been consumed, up to and including its end tag.
    fn typed(&mut self, tag: &str) -> Result<Value, TransportError> {
        match tag {
            "struct" => self.struct_body().map(Value::Struct),
            "array" => self.array_body().map(Value::Array),
            "nil" => {
                self.expect_end("nil")?;
                Ok(Value::Nil)
            },
            scalar_tag => {
                let (text, token) = self.text()?;
                match token {
                    Token::End(t) if t == scalar_tag => scalar(scalar_tag, &text),
                    other => Err(unexpected(&other, &format!("</{scalar_tag}>"))),
                }
            },
        }
    }

    fn struct_body(&mut self) -> Result<Struct, TransportError> {
        let mut fields = Struct::new();
        loop {
            match self.next()? {
                Token::End(t) if t == "struct" => return Ok(fields),
                Token::Start(t) if t == "member" => {
                    let name = match self.next()? {
                        Token::Start(t) if t == "name" => match self.text()? {
                            (name, Token::End(t)) if t == "name" => name,
                            (_, token) => return Err(unexpected(&token, "</name>")),
                        },
                        Token::Empty(t) if t == "name" => String::new(),
                        other => return Err(unexpected(&other, "<name>")),
                    };
                    let value = self.value()?;
                    self.expect_end("member")?;
                    fields.insert(name, value);
                },
                other => return Err(unexpected(&other, "<member> or </struct>")),
            }
        }
    }

    fn array_body(&mut self) -> Result<Vec<Value>, TransportError> {
        let mut items = Vec::new();
        match self.next()? {
            Token::Empty(t) if t == "data" => {},
            Token::Start(t) if t == "data" => loop {
                match self.next()? {
                    Token::End(t) if t == "data" => break,
                    Token::Start(t) if t == "value" => items.push(self.value_body()?),
                    Token::Empty(t) if t == "value" => items.push(Value::String(String::new())),
                    other => return Err(unexpected(&other, "<value> or </data>")),
                }
            },
            other => return Err(unexpected(&other, "<data>")),
        }
        self.expect_end("array")?;
        Ok(items)
    }
}

/// The value of a self-closing type element, like `<string/>` or `<struct/>`.
fn empty_typed(tag: &str) -> Result<Value, TransportError> {
    match tag {
        "struct" => Ok(Value::Struct(Struct::new())),
        "array" => Ok(Value::Array(Vec::new())),
        "nil" => Ok(Value::Nil),
        scalar_tag => scalar(scalar_tag, ""),
    }
}

fn scalar(tag: &str, text: &str) -> Result<Value, TransportError> {
    let bad = |what: &str| TransportError::Malformed(format!("invalid <{tag}> value {text:?}: {what}"));

    match tag {
        "i4" | "int" | "i8" => text.trim().parse().map(Value::Int).map_err(|e| bad(&e.to_string())),
        "boolean" => match text.trim() {
            "1" | "true" => Ok(Value::Bool(true)),
            "0" | "false" => Ok(Value::Bool(false)),
            _ => Err(bad("not a boolean")),
        },
        "string" => Ok(Value::String(text.to_string())),
        "double" => text.trim().parse().map(Value::Double).map_err(|e| bad(&e.to_string())),
        "dateTime.iso8601" => parse_timestamp(text)
            .map(Value::DateTime)
            .ok_or_else(|| bad("unrecognized timestamp format")),
        "base64" => {
            let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
            BASE64
                .decode(compact)
                .map(Value::Base64)
                .map_err(|e| bad(&e.to_string()))
        },
        other => Err(TransportError::Malformed(format!("unknown value type <{other}>"))),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn strukt(pairs: Vec<(&str, Value)>) -> Struct {
        pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn encodes_a_call() {
        let params = strukt(vec![
            ("domain", Value::String("a&b.example".into())),
            ("ns", Value::Array(vec![Value::String("ns1.inwx.de".into())])),
            ("roId", Value::Int(5)),
            ("big", Value::Int(1 << 40)),
            ("testing", Value::Bool(true)),
        ]);

        let xml = encode_call("nameserver.check", &params).unwrap();
        assert_eq!(
            xml,
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8"?>"#,
                "<methodCall><methodName>nameserver.check</methodName><params><param><value><struct>",
                "<member><name>big</name><value><i8>1099511627776</i8></value></member>",
                "<member><name>domain</name><value><string>a&amp;b.example</string></value></member>",
                "<member><name>ns</name><value><array><data><value><string>ns1.inwx.de</string></value></data></array></value></member>",
                "<member><name>roId</name><value><int>5</int></value></member>",
                "<member><name>testing</name><value><boolean>1</boolean></value></member>",
                "</struct></value></param></params></methodCall>",
            )
        );
    }

    #[test]
    fn decodes_a_typical_response() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<methodResponse>
  <params>
    <param>
      <value>
        <struct>
          <member><name>code</name><value><int>1000</int></value></member>
          <member><name>msg</name><value><string>Command completed successfully</string></value></member>
          <member><name>resData</name><value><struct>
            <member><name>count</name><value><i4>1</i4></value></member>
            <member><name>lastZoneCheck</name><value><dateTime.iso8601>20240131T12:30:05</dateTime.iso8601></value></member>
            <member><name>record</name><value><array><data>
              <value><struct>
                <member><name>name</name><value>www.example.com</value></member>
                <member><name>urlAppend</name><value><boolean>0</boolean></value></member>
                <member><name>prio</name><value><double>1.5</double></value></member>
                <member><name>content</name><value><string/></value></member>
                <member><name>raw</name><value><base64>aGVs
                  bG8=</base64></value></member>
              </struct></value>
            </data></array></value></member>
            <member><name>none</name><value><nil/></value></member>
          </struct></value></member>
        </struct>
      </value>
    </param>
  </params>
</methodResponse>"#;

        let value = decode_response(xml).unwrap();
        let Value::Struct(top) = value else { panic!("not a struct") };
        assert_eq!(top["code"], Value::Int(1000));
        assert_eq!(top["msg"], Value::String("Command completed successfully".into()));

        let Value::Struct(data) = &top["resData"] else { panic!("resData not a struct") };
        assert_eq!(data["count"], Value::Int(1));
        assert_eq!(
            data["lastZoneCheck"],
            Value::DateTime(Utc.with_ymd_and_hms(2024, 1, 31, 12, 30, 5).unwrap())
        );
        assert_eq!(data["none"], Value::Nil);

        let Value::Array(records) = &data["record"] else { panic!("record not an array") };
        let Value::Struct(record) = &records[0] else { panic!("record[0] not a struct") };
        assert_eq!(record["name"], Value::String("www.example.com".into()));
        assert_eq!(record["urlAppend"], Value::Bool(false));
        assert_eq!(record["prio"], Value::Double(1.5));
        assert_eq!(record["content"], Value::String(String::new()));
        assert_eq!(record["raw"], Value::Base64(b"hello".to_vec()));
    }

    #[test]
    fn preserves_whitespace_in_strings_and_unescapes() {
        let xml = "<methodResponse><params><param><value><string>  a &lt;b&gt; </string></value></param></params></methodResponse>";
        assert_eq!(decode_response(xml).unwrap(), Value::String("  a <b> ".into()));
    }

    #[test]
    fn non_finite_doubles_are_not_sent() {
        for d in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let nested = strukt(vec![("prices", Value::Array(vec![Value::Double(1.0), Value::Double(d)]))]);
            match encode_call("domain.update", &nested) {
                Err(TransportError::Unencodable(what)) => assert!(what.starts_with("`prices`"), "{what}"),
                other => panic!("expected an encoding error, got {other:?}"),
            }
        }
    }

    #[test]
    fn empty_member_names_are_accepted() {
        let xml = "<methodResponse><params><param><value><struct>\
            <member><name/><value><int>1</int></value></member>\
            <member><name></name><value><int>2</int></value></member>\
            </struct></value></param></params></methodResponse>";

        // Both spellings name the same (empty) key, so the later one wins.
        assert_eq!(decode_response(xml).unwrap(), Value::Struct(strukt(vec![("", Value::Int(2))])));
    }

    #[test]
    fn faults_are_transport_errors() {
        let xml = r#"<methodResponse><fault><value><struct>
            <member><name>faultCode</name><value><int>-32700</int></value></member>
            <member><name>faultString</name><value><string>parse error</string></value></member>
        </struct></value></fault></methodResponse>"#;

        match decode_response(xml) {
            Err(TransportError::Fault { code, message }) => {
                assert_eq!(code, -32700);
                assert_eq!(message, "parse error");
            },
            other => panic!("expected a fault, got {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_documents() {
        for xml in [
            "",
            "<html><body>502 Bad Gateway</body></html>",
            "<methodResponse><params><param><value><int>abc</int></value></param></params></methodResponse>",
            "<methodResponse><params><param><value><float>1</float></value></param></params></methodResponse>",
            "<methodResponse><params><param><value><struct><member><value>1</value></member></struct></value></param></params></methodResponse>",
        ] {
            assert!(
                matches!(decode_response(xml), Err(TransportError::Malformed(_))),
                "accepted {xml:?}"
            );
        }
    }

    #[test]
    fn encoded_values_parse_back() {
        let params = strukt(vec![
            ("created", Value::DateTime(Utc.with_ymd_and_hms(2023, 5, 1, 8, 0, 0).unwrap())),
            ("nested", Value::Struct(strukt(vec![("x", Value::Nil), ("y", Value::Double(2.25))]))),
            ("key", Value::Base64(vec![0, 1, 2, 255])),
        ]);

        let call = encode_call("dnssec.adddnskey", &params).unwrap();
        // Reuse the value part of the call as the body of a response.
        let start = call.find("<value>").unwrap();
        let end = call.rfind("</value>").unwrap() + "</value>".len();
        let response = format!(
            "<methodResponse><params><param>{}</param></params></methodResponse>",
            &call[start..end]
        );

        assert_eq!(decode_response(&response).unwrap(), Value::Struct(params));
    }
}
