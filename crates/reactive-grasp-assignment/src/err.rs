// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use std::num::ParseIntError;

#[derive(Debug)]
pub enum InstanceLoadError {
    Io(std::io::Error),
    Parse(ParseIntError),
    /// The file ended before all `n * n` costs were read.
    Truncated,
    /// The declared number of tasks was zero.
    EmptyInstance,
}

impl std::fmt::Display for InstanceLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstanceLoadError::Io(err) => write!(f, "I/O error reading instance: {}", err),
            InstanceLoadError::Parse(err) => write!(f, "Malformed integer in instance: {}", err),
            InstanceLoadError::Truncated => {
                write!(f, "Instance file ended before the cost matrix was complete")
            }
            InstanceLoadError::EmptyInstance => {
                write!(f, "Instance declares zero tasks")
            }
        }
    }
}

impl std::error::Error for InstanceLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InstanceLoadError::Io(err) => Some(err),
            InstanceLoadError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for InstanceLoadError {
    fn from(err: std::io::Error) -> Self {
        InstanceLoadError::Io(err)
    }
}

impl From<ParseIntError> for InstanceLoadError {
    fn from(err: ParseIntError) -> Self {
        InstanceLoadError::Parse(err)
    }
}
