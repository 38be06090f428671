/// HTTP request methods the server implements.
///
/// Any other method is answered with 501 Not Implemented, so it never gets a
/// variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// HEAD - Like GET but without the response body
    HEAD,
}

impl Method {
    /// Parses an HTTP method from a string.
    ///
    /// # Arguments
    ///
    /// * `s` - String representation of the method (case-sensitive)
    ///
    /// # Returns
    ///
    /// `Some(Method)` for `GET` and `HEAD`, `None` otherwise.
    ///
    /// # Example
    ///
    /// ```
    /// # use fileserver::http::request::Method;
    /// assert_eq!(Method::from_str("HEAD"), Some(Method::HEAD));
    /// assert_eq!(Method::from_str("POST"), None);
    /// assert_eq!(Method::from_str("get"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            "HEAD" => Some(Method::HEAD),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
        }
    }
}

/// The three parts of an accepted request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    /// The HTTP method
    pub method: Method,
    /// The request target exactly as sent (e.g. "/index.html")
    pub uri: String,
    /// HTTP version without the "HTTP/" prefix (e.g. "1.1")
    pub version: String,
}

/// Request headers in arrival order.
///
/// Names keep the case they were sent with and values are stored
/// lower-cased. Inserting a name that is already present replaces its value
/// but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: Vec<(String, String)>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `name -> lowercase(value)`, overwriting any earlier value for
    /// the exact same name.
    pub fn insert(&mut self, name: impl Into<String>, value: &str) {
        let name = name.into();
        let value = value.to_lowercase();

        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Looks a header up by its exact name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A request as read off the wire, before the request line is interpreted.
#[derive(Debug, Clone)]
pub struct Request {
    /// The first line, without its line terminator
    pub line: String,
    /// Every header line that matched `name: value`
    pub headers: HeaderMap,
}

impl Request {
    /// Whether the request carries enough to be answered.
    ///
    /// A request line with no accepted header lines at all is treated as
    /// malformed and answered with 400.
    pub fn is_well_formed(&self) -> bool {
        !self.line.is_empty() && !self.headers.is_empty()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }
}
