//! Built-in rule set for `TokensTable.js`.
//!
//! Each rule targets one control in a row of the tokens table. The literals
//! are matched byte-for-byte, including the 18-space JSX indentation, so any
//! reformatting of the component makes the affected rule report as skipped.

use crate::rule::{Rule, RuleSet};

/// Location of the tokens table component, relative to the workspace root.
pub const DEFAULT_TARGET: &str = "web/default/src/components/TokensTable.js";

/// Name reported for the built-in rule set.
pub const RULE_SET_NAME: &str = "tokens-table-a11y";

pub const VISIBILITY_TOGGLE_OLD: &str = r#"                  <Popup
                    trigger={
                      <Button
                        size="mini"
                        icon
                        onClick={() => toggleKeyVisibility(token.id)}
                      >
                        <Icon name={showKeys[token.id] ? 'eye slash' : 'eye'} />
                      </Button>
                    }
                    content={showKeys[token.id] ? t('common:hide') : t('common:show')}
                    basic
                    inverted
                  />"#;

pub const VISIBILITY_TOGGLE_NEW: &str = r#"                  <Popup
                    trigger={
                      <Button
                        size="mini"
                        icon
                        onClick={() => toggleKeyVisibility(token.id)}
                        aria-label={showKeys[token.id] ? t('common:hide', 'Hide') : t('common:show', 'Show')}
                      >
                        <Icon name={showKeys[token.id] ? 'eye slash' : 'eye'} />
                      </Button>
                    }
                    content={showKeys[token.id] ? t('common:hide', 'Hide') : t('common:show', 'Show')}
                    basic
                    inverted
                  />"#;

pub const COPY_KEY_OLD: &str = r#"                  <Popup
                    trigger={
                      <Button
                        size="mini"
                        icon
                        onClick={() => copyTokenKey(token.key)}
                      >
                        <Icon name="copy" />
                      </Button>
                    }
                    content={t('common:copy')}
                    basic
                    inverted
                  />"#;

pub const COPY_KEY_NEW: &str = r#"                  <Popup
                    trigger={
                      <Button
                        size="mini"
                        icon
                        onClick={() => copyTokenKey(token.key)}
                        aria-label={t('common:copy', 'Copy')}
                      >
                        <Icon name="copy" />
                      </Button>
                    }
                    content={t('common:copy', 'Copy')}
                    basic
                    inverted
                  />"#;

pub const ENABLE_DISABLE_OLD: &str = r#"                  <Popup
                    trigger={
                      <Button
                        size='small'
                        positive={token.status === 1}
                        negative={token.status !== 1}
                        onClick={() => {
                          manageToken(
                            token.id,
                            token.status === 1 ? 'disable' : 'enable',
                            idx
                          );
                        }}
                      >
                        {token.status === 1 ? (
                          <Icon name='pause' />
                        ) : (
                          <Icon name='play' />
                        )}
                      </Button>
                    }
                    content={
                      token.status === 1
                        ? t('common:disable')
                        : t('common:enable')
                    }
                    basic
                    inverted
                  />"#;

pub const ENABLE_DISABLE_NEW: &str = r#"                  <Popup
                    trigger={
                      <Button
                        size='small'
                        positive={token.status === 1}
                        negative={token.status !== 1}
                        onClick={() => {
                          manageToken(
                            token.id,
                            token.status === 1 ? 'disable' : 'enable',
                            idx
                          );
                        }}
                        aria-label={
                          token.status === 1
                            ? t('common:disable', 'Disable')
                            : t('common:enable', 'Enable')
                        }
                      >
                        {token.status === 1 ? (
                          <Icon name='pause' />
                        ) : (
                          <Icon name='play' />
                        )}
                      </Button>
                    }
                    content={
                      token.status === 1
                        ? t('common:disable', 'Disable')
                        : t('common:enable', 'Enable')
                    }
                    basic
                    inverted
                  />"#;

pub const EDIT_LINK_OLD: &str = r#"                  <Popup
                    trigger={
                      <Button
                        size='small'
                        color='blue'
                        as={Link}
                        to={'/token/edit/' + token.id}
                      >
                        <Icon name='edit' />
                      </Button>
                    }
                    content={t('common:edit')}
                    basic
                    inverted
                  />"#;

pub const EDIT_LINK_NEW: &str = r#"                  <Popup
                    trigger={
                      <Button
                        size='small'
                        color='blue'
                        as={Link}
                        to={'/token/edit/' + token.id}
                        aria-label={t('common:edit', 'Edit')}
                      >
                        <Icon name='edit' />
                      </Button>
                    }
                    content={t('common:edit', 'Edit')}
                    basic
                    inverted
                  />"#;

pub const DELETE_CONFIRM_OLD: &str = r#"                  <Popup
                    trigger={
                      <Button
                        size='small'
                        negative
                        onClick={() => {
                          manageToken(token.id, 'delete', idx);
                        }}
                      >
                        <Icon name='trash' />
                      </Button>
                    }
                    content={t('common:delete')}
                    basic
                    inverted
                  />"#;

pub const DELETE_CONFIRM_NEW: &str = r#"                  <Popup
                    trigger={
                      <Button
                        size='small'
                        negative
                        aria-label={t('common:delete', 'Delete')}
                      >
                        <Icon name='trash' />
                      </Button>
                    }
                    on='click'
                    flowing
                    hoverable
                  >
                    <Button
                      negative
                      onClick={() => {
                        manageToken(token.id, 'delete', idx);
                      }}
                    >
                      {t('token.confirm_delete', 'Delete Token')}
                    </Button>
                  </Popup>"#;

/// The five tokens-table rules in application order.
pub fn rules() -> RuleSet {
    RuleSet::new(
        RULE_SET_NAME,
        vec![
            Rule::new(
                "visibility-toggle",
                "label the show/hide key button and add Hide/Show fallbacks",
                VISIBILITY_TOGGLE_OLD,
                VISIBILITY_TOGGLE_NEW,
            ),
            Rule::new(
                "copy-key",
                "label the copy key button and add a Copy fallback",
                COPY_KEY_OLD,
                COPY_KEY_NEW,
            ),
            Rule::new(
                "enable-disable",
                "label the enable/disable button and add Enable/Disable fallbacks",
                ENABLE_DISABLE_OLD,
                ENABLE_DISABLE_NEW,
            ),
            Rule::new(
                "edit-link",
                "label the edit link button and add an Edit fallback",
                EDIT_LINK_OLD,
                EDIT_LINK_NEW,
            ),
            Rule::new(
                "delete-confirm",
                "move token deletion behind a click-to-open confirmation popup",
                DELETE_CONFIRM_OLD,
                DELETE_CONFIRM_NEW,
            ),
        ],
    )
    .with_target(DEFAULT_TARGET)
}
