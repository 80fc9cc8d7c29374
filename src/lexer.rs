use crate::query::QueryError;

/// Tokens of the relaxed query syntax.
///
/// The syntax accepts bare keys, bare string values, single- or
/// double-quoted strings, and optional outer braces, so `id:199356` and
/// `{"id": 199356}` tokenize to the same stream modulo the braces.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Colon,
    Comma,

    /// Bare word: a key or an unquoted string value
    Ident(String),
    /// `$`-prefixed operator key, e.g. `$in` (stored with the `$`)
    Operator(String),
    /// Quoted string (single or double quotes)
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,

    Eof,
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn is_word_char(ch: char) -> bool {
        ch.is_alphanumeric() || ch == '_' || ch == '-' || ch == '.'
    }

    fn read_word(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if Self::is_word_char(ch) {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_string(&mut self, quote: char) -> Result<String, QueryError> {
        let mut result = String::new();
        self.advance(); // Consume opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    self.advance(); // Consume backslash
                    match self.current_char() {
                        Some('n') => result.push('\n'),
                        Some('t') => result.push('\t'),
                        Some('r') => result.push('\r'),
                        Some('"') => result.push('"'),
                        Some('\'') => result.push('\''),
                        Some('\\') => result.push('\\'),
                        Some(ch) => {
                            return Err(QueryError::UnexpectedChar {
                                ch,
                                position: self.position,
                            });
                        }
                        None => return Err(QueryError::UnterminatedString),
                    }
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(QueryError::UnterminatedString)
    }

    fn read_number(&mut self) -> Result<Token, QueryError> {
        let mut number = String::new();
        let mut is_float = false;

        if self.current_char() == Some('-') {
            number.push('-');
            self.advance();
        }

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.'
                && !is_float
                && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
            {
                is_float = true;
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        // Digit-leading bare words like `2023-01-01` or `1.2.3` are string
        // values, not malformed numbers
        if self.current_char().is_some_and(Self::is_word_char) {
            let rest = self.read_word();
            number.push_str(&rest);
            return Ok(Token::Ident(number));
        }

        if is_float {
            number
                .parse::<f64>()
                .map(Token::Float)
                .map_err(|_| QueryError::InvalidNumber(number))
        } else {
            number
                .parse::<i64>()
                .map(Token::Integer)
                .map_err(|_| QueryError::InvalidNumber(number))
        }
    }

    pub fn next_token(&mut self) -> Result<Token, QueryError> {
        self.skip_whitespace();

        match self.current_char() {
            None => Ok(Token::Eof),
            Some('{') => {
                self.advance();
                Ok(Token::LBrace)
            }
            Some('}') => {
                self.advance();
                Ok(Token::RBrace)
            }
            Some('[') => {
                self.advance();
                Ok(Token::LBracket)
            }
            Some(']') => {
                self.advance();
                Ok(Token::RBracket)
            }
            Some(':') => {
                self.advance();
                Ok(Token::Colon)
            }
            Some(',') => {
                self.advance();
                Ok(Token::Comma)
            }
            Some('"') => Ok(Token::String(self.read_string('"')?)),
            Some('\'') => Ok(Token::String(self.read_string('\'')?)),
            Some('$') => {
                self.advance();
                let name = self.read_word();
                if name.is_empty() {
                    Err(QueryError::UnexpectedChar {
                        ch: '$',
                        position: self.position,
                    })
                } else {
                    Ok(Token::Operator(format!("${}", name)))
                }
            }
            Some('-') if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.read_number()
            }
            Some(ch) if ch.is_ascii_digit() => self.read_number(),
            Some(ch) if ch.is_alphanumeric() || ch == '_' => {
                let word = self.read_word();

                match word.as_str() {
                    "true" => Ok(Token::Boolean(true)),
                    "false" => Ok(Token::Boolean(false)),
                    "null" => Ok(Token::Null),
                    _ => Ok(Token::Ident(word)),
                }
            }
            Some(ch) => Err(QueryError::UnexpectedChar {
                ch,
                position: self.position,
            }),
        }
    }
}

#[test]
fn test_bare_pair() {
    let mut lexer = Lexer::new("id:199356");
    assert_eq!(lexer.next_token().unwrap(), Token::Ident("id".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::Colon);
    assert_eq!(lexer.next_token().unwrap(), Token::Integer(199356));
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}

#[test]
fn test_operator_and_list() {
    let mut lexer = Lexer::new("id:{$in:[1,2]}");
    assert_eq!(lexer.next_token().unwrap(), Token::Ident("id".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::Colon);
    assert_eq!(lexer.next_token().unwrap(), Token::LBrace);
    assert_eq!(lexer.next_token().unwrap(), Token::Operator("$in".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::Colon);
    assert_eq!(lexer.next_token().unwrap(), Token::LBracket);
    assert_eq!(lexer.next_token().unwrap(), Token::Integer(1));
    assert_eq!(lexer.next_token().unwrap(), Token::Comma);
    assert_eq!(lexer.next_token().unwrap(), Token::Integer(2));
    assert_eq!(lexer.next_token().unwrap(), Token::RBracket);
    assert_eq!(lexer.next_token().unwrap(), Token::RBrace);
}

#[test]
fn test_digit_leading_words_are_strings() {
    let mut lexer = Lexer::new("date:2023-01-01,version:1.2.3");
    assert_eq!(lexer.next_token().unwrap(), Token::Ident("date".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::Colon);
    assert_eq!(
        lexer.next_token().unwrap(),
        Token::Ident("2023-01-01".to_string())
    );
    assert_eq!(lexer.next_token().unwrap(), Token::Comma);
    assert_eq!(lexer.next_token().unwrap(), Token::Ident("version".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::Colon);
    assert_eq!(lexer.next_token().unwrap(), Token::Ident("1.2.3".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}

#[test]
fn test_keywords_and_quotes() {
    let mut lexer = Lexer::new("premium:false,author:'Piet Pieterse'");
    assert_eq!(lexer.next_token().unwrap(), Token::Ident("premium".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::Colon);
    assert_eq!(lexer.next_token().unwrap(), Token::Boolean(false));
    assert_eq!(lexer.next_token().unwrap(), Token::Comma);
    assert_eq!(lexer.next_token().unwrap(), Token::Ident("author".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::Colon);
    assert_eq!(
        lexer.next_token().unwrap(),
        Token::String("Piet Pieterse".to_string())
    );
}
