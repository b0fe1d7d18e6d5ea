//! Built-in course modules.
//!
//! These predate the file-based content pipeline and live in code. The
//! resolver merges them with filesystem modules; a filesystem module with
//! the same slug replaces its legacy counterpart.

use course_core::model::{
    Badge, BadgeId, ContentSource, Difficulty, Lesson, LessonId, Module, ModuleId, Quiz,
    QuizQuestion, Slug,
};

use crate::markdown;

/// Returns every built-in module, already ordered by `order`.
#[must_use]
pub fn legacy_modules() -> Vec<Module> {
    vec![auth_fundamentals(), oauth_deep_dive()]
}

fn lesson(
    slug: &str,
    order: u32,
    title: &str,
    description: &str,
    duration_minutes: u32,
    key_takeaways: &[&str],
    body: &str,
) -> Lesson {
    Lesson {
        id: LessonId::new(slug),
        slug: Slug::new(slug),
        order,
        title: title.to_string(),
        description: description.to_string(),
        duration_minutes,
        key_takeaways: key_takeaways.iter().map(ToString::to_string).collect(),
        prerequisites: Vec::new(),
        body: body.to_string(),
        html: markdown::render(body),
    }
}

fn auth_fundamentals() -> Module {
    Module {
        id: ModuleId::new("auth-fundamentals"),
        slug: Slug::new("auth-fundamentals"),
        order: 1,
        title: "Authentication Fundamentals".to_string(),
        description: "How systems establish who you are before deciding what you may do."
            .to_string(),
        difficulty: Difficulty::Beginner,
        estimated_hours: 2.0,
        badge: Badge {
            id: BadgeId::new("auth-fundamentals-badge"),
            title: "Identity Apprentice".to_string(),
            description: "Completed Authentication Fundamentals".to_string(),
        },
        learning_objectives: vec![
            "Distinguish authentication from authorization".to_string(),
            "Explain how sessions keep a user logged in".to_string(),
            "Evaluate when multi-factor authentication is warranted".to_string(),
        ],
        prerequisites: vec![],
        password_protected: false,
        source: ContentSource::Legacy,
        lessons: vec![
            lesson(
                "what-is-identity",
                1,
                "What is Identity?",
                "Accounts, principals, and the difference between a person and their record.",
                10,
                &["An identity is a record a system can reason about, not a person"],
                "# What is Identity?\n\nEvery access decision starts from a stored record: a \
                 principal with an identifier, attributes, and credentials. The person behind \
                 the keyboard is invisible to the system; the record is all it has.\n\n\
                 - A **principal** is anything that can be authenticated: a user, a service, a device.\n\
                 - **Attributes** (email, department, roles) feed later authorization decisions.\n",
            ),
            lesson(
                "authentication-vs-authorization",
                2,
                "Authentication vs. Authorization",
                "The two questions every request must answer, and why conflating them hurts.",
                12,
                &[
                    "Authentication answers who; authorization answers what",
                    "The two checks fail differently: 401 vs 403",
                ],
                "# Authentication vs. Authorization\n\nAuthentication (authn) verifies a claimed \
                 identity. Authorization (authz) decides what that identity may do. Systems that \
                 blur the two end up with checks in the wrong layer.\n\n\
                 | Question | Mechanism | Failure |\n|---|---|---|\n\
                 | Who are you? | passwords, keys, tokens | 401 Unauthorized |\n\
                 | What may you do? | roles, policies, scopes | 403 Forbidden |\n",
            ),
            lesson(
                "passwords-and-beyond",
                3,
                "Passwords and Beyond",
                "Why password storage is a one-way street, and what replaces passwords.",
                15,
                &["Store password hashes with a slow, salted algorithm, never the password"],
                "# Passwords and Beyond\n\nA credential store never needs the password back, only \
                 proof the user knows it, so passwords are hashed with slow, salted algorithms. \
                 Passkeys replace the shared secret entirely with a key pair.\n",
            ),
            lesson(
                "sessions-and-cookies",
                4,
                "Sessions and Cookies",
                "How one login stretches across many requests.",
                12,
                &["A session cookie is a bearer credential; protect it like one"],
                "# Sessions and Cookies\n\nHTTP is stateless, so after login the server issues a \
                 session identifier in a cookie. Whoever presents the cookie *is* the user, which \
                 is why `HttpOnly`, `Secure`, and expiry matter.\n",
            ),
            lesson(
                "multi-factor-authentication",
                5,
                "Multi-Factor Authentication",
                "Layering something you know with something you have or are.",
                11,
                &["Factors only help when they fail independently"],
                "# Multi-Factor Authentication\n\nMFA combines independent factors: knowledge, \
                 possession, inherence. A password plus a code sent to the same browser is one \
                 factor wearing two hats; a phishing-resistant second factor binds to the origin.\n",
            ),
        ],
        quiz: Quiz {
            passing_score: 80,
            questions: vec![
                QuizQuestion {
                    id: "af-q1".to_string(),
                    prompt: "A request fails with 403 Forbidden. Which check failed?".to_string(),
                    options: vec![
                        "Authentication".to_string(),
                        "Authorization".to_string(),
                        "Session expiry".to_string(),
                    ],
                    correct_option: 1,
                    explanation: Some(
                        "403 means the caller is known but not permitted; 401 signals a failed or \
                         missing authentication."
                            .to_string(),
                    ),
                },
                QuizQuestion {
                    id: "af-q2".to_string(),
                    prompt: "How should a service store user passwords?".to_string(),
                    options: vec![
                        "Encrypted with a reversible key".to_string(),
                        "As salted hashes from a slow algorithm".to_string(),
                        "In plaintext behind a firewall".to_string(),
                    ],
                    correct_option: 1,
                    explanation: None,
                },
                QuizQuestion {
                    id: "af-q3".to_string(),
                    prompt: "Which pair forms two independent authentication factors?".to_string(),
                    options: vec![
                        "Password and security question".to_string(),
                        "Password and hardware security key".to_string(),
                        "Two different passwords".to_string(),
                    ],
                    correct_option: 1,
                    explanation: Some(
                        "Two knowledge factors fail together under phishing; possession fails \
                         independently."
                            .to_string(),
                    ),
                },
            ],
        },
    }
}

fn oauth_deep_dive() -> Module {
    Module {
        id: ModuleId::new("oauth-deep-dive"),
        slug: Slug::new("oauth-deep-dive"),
        order: 2,
        title: "OAuth 2.0 Deep Dive".to_string(),
        description: "Delegated authorization: letting apps act on your behalf without your password."
            .to_string(),
        difficulty: Difficulty::Intermediate,
        estimated_hours: 3.0,
        badge: Badge {
            id: BadgeId::new("oauth-deep-dive-badge"),
            title: "Token Wrangler".to_string(),
            description: "Completed OAuth 2.0 Deep Dive".to_string(),
        },
        learning_objectives: vec![
            "Name the four OAuth roles and their responsibilities".to_string(),
            "Walk through the authorization code flow end to end".to_string(),
            "Choose the right flow for a given client type".to_string(),
        ],
        prerequisites: vec![Slug::new("auth-fundamentals")],
        password_protected: false,
        source: ContentSource::Legacy,
        lessons: vec![
            lesson(
                "oauth-roles",
                1,
                "The Four Roles",
                "Resource owner, client, authorization server, resource server.",
                10,
                &["OAuth separates the app asking for access from the server granting it"],
                "# The Four Roles\n\nOAuth names its actors precisely: the **resource owner** \
                 (you), the **client** (the app that wants access), the **authorization server** \
                 (issues tokens), and the **resource server** (holds the data and checks tokens).\n",
            ),
            lesson(
                "authorization-code-flow",
                2,
                "The Authorization Code Flow",
                "The front-channel/back-channel dance behind every 'Sign in with' button.",
                18,
                &[
                    "The browser only ever sees the short-lived code, never the token",
                    "The code is redeemed on the back channel with client credentials",
                ],
                "# The Authorization Code Flow\n\n1. The client redirects the browser to the \
                 authorization server.\n2. The user authenticates and consents.\n3. The server \
                 redirects back with a one-time **authorization code**.\n4. The client exchanges \
                 the code for tokens over a direct back-channel call.\n\nSplitting the flow keeps \
                 tokens out of browser history and referrer headers.\n",
            ),
            lesson(
                "tokens-and-scopes",
                3,
                "Tokens and Scopes",
                "Access tokens, refresh tokens, and how scopes bound what a token can do.",
                14,
                &["A scope is a ceiling on delegated power, not a guarantee of it"],
                "# Tokens and Scopes\n\nAn access token is a credential the client presents to \
                 the resource server; scopes carried with it cap what the token may be used for. \
                 Refresh tokens let the client obtain new access tokens without re-prompting the \
                 user.\n",
            ),
            lesson(
                "pkce-and-public-clients",
                4,
                "PKCE and Public Clients",
                "Why mobile apps and SPAs need proof-of-possession on the code exchange.",
                15,
                &["PKCE binds the code exchange to whoever started the flow"],
                "# PKCE and Public Clients\n\nPublic clients cannot keep a secret, so the code \
                 exchange is protected by PKCE: the client commits to a random verifier up front \
                 and must replay it at exchange time. A stolen code alone is useless.\n",
            ),
        ],
        quiz: Quiz {
            passing_score: 80,
            questions: vec![
                QuizQuestion {
                    id: "od-q1".to_string(),
                    prompt: "In the authorization code flow, what does the browser carry back to the client?"
                        .to_string(),
                    options: vec![
                        "The access token".to_string(),
                        "A one-time authorization code".to_string(),
                        "The user's password".to_string(),
                    ],
                    correct_option: 1,
                    explanation: Some(
                        "Tokens travel only on the back channel; the front channel sees just the \
                         short-lived code."
                            .to_string(),
                    ),
                },
                QuizQuestion {
                    id: "od-q2".to_string(),
                    prompt: "Which flow suits a single-page application?".to_string(),
                    options: vec![
                        "Implicit flow".to_string(),
                        "Authorization code with PKCE".to_string(),
                        "Client credentials".to_string(),
                    ],
                    correct_option: 1,
                    explanation: None,
                },
            ],
        },
    }
}
