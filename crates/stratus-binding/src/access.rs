//! Minimal action sets per resource kind and access level.
//!
//! `readwrite` is the union of `read` and `write`; `admin` adds the
//! management-plane actions on top of `readwrite`.

use stratus_common::types::AccessLevel;

/// Data-plane and management-plane actions of one resource kind.
#[derive(Debug, Clone, Copy)]
pub struct ActionSet {
    /// Actions granted for `read`.
    pub read: &'static [&'static str],
    /// Actions granted for `write`.
    pub write: &'static [&'static str],
    /// Actions granted only for `admin`.
    pub manage: &'static [&'static str],
}

impl ActionSet {
    /// Returns the deduplicated actions for `access`, in declaration order.
    #[must_use]
    pub fn actions(&self, access: AccessLevel) -> Vec<&'static str> {
        let mut actions: Vec<&'static str> = Vec::new();
        let groups = [
            (access.reads(), self.read),
            (access.writes(), self.write),
            (access.manages(), self.manage),
        ];
        for (granted, group) in groups {
            if !granted {
                continue;
            }
            for action in group {
                if !actions.contains(action) {
                    actions.push(*action);
                }
            }
        }
        actions
    }
}

/// Message queue actions.
pub const QUEUE: ActionSet = ActionSet {
    read: &[
        "sqs:ReceiveMessage",
        "sqs:DeleteMessage",
        "sqs:ChangeMessageVisibility",
        "sqs:GetQueueAttributes",
        "sqs:GetQueueUrl",
    ],
    write: &["sqs:SendMessage", "sqs:GetQueueAttributes", "sqs:GetQueueUrl"],
    manage: &["sqs:PurgeQueue", "sqs:SetQueueAttributes"],
};

/// Object storage actions.
pub const BUCKET: ActionSet = ActionSet {
    read: &["s3:GetObject", "s3:ListBucket"],
    write: &["s3:PutObject", "s3:DeleteObject", "s3:AbortMultipartUpload"],
    manage: &[
        "s3:PutBucketVersioning",
        "s3:PutLifecycleConfiguration",
        "s3:PutBucketPolicy",
    ],
};

/// Key-value table actions.
pub const TABLE: ActionSet = ActionSet {
    read: &[
        "dynamodb:GetItem",
        "dynamodb:BatchGetItem",
        "dynamodb:Query",
        "dynamodb:Scan",
        "dynamodb:DescribeTable",
    ],
    write: &[
        "dynamodb:PutItem",
        "dynamodb:UpdateItem",
        "dynamodb:DeleteItem",
        "dynamodb:BatchWriteItem",
    ],
    manage: &[
        "dynamodb:UpdateTable",
        "dynamodb:UpdateTimeToLive",
        "dynamodb:CreateBackup",
    ],
};

/// Table change stream actions.
pub const TABLE_STREAM: &[&str] = &[
    "dynamodb:DescribeStream",
    "dynamodb:GetRecords",
    "dynamodb:GetShardIterator",
    "dynamodb:ListStreams",
];

/// Pub/sub topic actions.
pub const TOPIC: ActionSet = ActionSet {
    read: &["sns:GetTopicAttributes", "sns:ListSubscriptionsByTopic"],
    write: &["sns:Publish"],
    manage: &["sns:SetTopicAttributes", "sns:DeleteTopic"],
};

/// Relational database actions, scoped to the credentials secret.
pub const DATABASE: ActionSet = ActionSet {
    read: &["secretsmanager:GetSecretValue", "secretsmanager:DescribeSecret"],
    write: &["secretsmanager:GetSecretValue", "rds-data:ExecuteStatement"],
    manage: &["secretsmanager:RotateSecret", "rds:ModifyDBInstance"],
};
